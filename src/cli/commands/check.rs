//! Check command - Dry-run the guard for a move

use std::path::Path;

use crate::domain::{decide, GuardDecision, RuleTable};
use crate::errors::Result;
use crate::schemas::{Area, FieldKind};
use crate::store::TicketRepository;
use crate::workflow::ensure_area_changes;

use super::Shop;

pub async fn run(cwd: Option<&Path>, id: &str, area: Area) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let ticket = shop.store.load(id).await?;
    ensure_area_changes(&ticket, area)?;

    let rules = RuleTable::standard();
    let decision = decide(&ticket, ticket.current_area, area, &rules);
    println!("{} -> {}: {}", ticket.current_area, area, decision.describe());

    if let GuardDecision::OpenForm(rule) = &decision {
        for field in &rule.fields {
            let marker = if field.required { "*" } else { " " };
            println!("  {} {:<16} {}", marker, field.id, describe_kind(&field.kind));
        }
        if rule.has_resolver() && !ticket.service_actions.is_empty() {
            println!("  {} open action(s) to resolve", ticket.service_actions.len());
        }
    }
    Ok(())
}

fn describe_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::TextArea => "text area".to_string(),
        FieldKind::Select { options } => format!("one of: {}", options.join(" | ")),
        FieldKind::Number => "number".to_string(),
        FieldKind::ActionBuilder { .. } => "action list".to_string(),
        FieldKind::ActionResolver => "resolve open actions".to_string(),
        FieldKind::BudgetStatusSelector => "budget status".to_string(),
        FieldKind::HardwareSwaps => "hardware swaps".to_string(),
    }
}
