//! Create command - Register a ticket at intake

use std::path::Path;

use uuid::Uuid;

use crate::errors::{RepairflowError, Result};
use crate::schemas::Ticket;
use crate::store::TicketRepository;

use super::Shop;

pub async fn run(
    cwd: Option<&Path>,
    code: &str,
    model: Option<&str>,
    contact: Option<&str>,
    id: Option<&str>,
) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let ticket = build_ticket(code, model, contact, id)?;
    shop.store.insert(ticket.clone()).await?;
    println!("Created ticket {} ({})", ticket.id, ticket.human_code);
    Ok(())
}

fn build_ticket(
    code: &str,
    model: Option<&str>,
    contact: Option<&str>,
    id: Option<&str>,
) -> Result<Ticket> {
    let code = code.trim();
    if code.is_empty() {
        return Err(RepairflowError::Validation(
            "ticket code must not be empty".to_string(),
        ));
    }
    let id = match id.map(str::trim) {
        Some(id) if id.is_empty() || id.contains(['/', '\\', '.']) => {
            return Err(RepairflowError::Validation(format!(
                "invalid ticket id '{}'",
                id
            )))
        }
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    Ok(Ticket::new(id, code)
        .with_model(model.unwrap_or_default())
        .with_contact(contact.map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Area;

    #[test]
    fn test_build_ticket() {
        let ticket = build_ticket("A-001", Some("T480"), Some("555-0100"), None).unwrap();
        assert_eq!(ticket.current_area, Area::Intake);
        assert_eq!(ticket.model_name, "T480");
        assert!(Uuid::parse_str(&ticket.id).is_ok());
    }

    #[test]
    fn test_build_ticket_rejects_bad_input() {
        assert!(build_ticket("  ", None, None, None).is_err());
        assert!(build_ticket("A-001", None, None, Some("../etc")).is_err());
        assert_eq!(
            build_ticket("A-001", None, None, Some("t-7")).unwrap().id,
            "t-7"
        );
    }
}
