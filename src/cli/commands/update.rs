//! Update command - Save technical info and QA results

use std::path::Path;

use crate::errors::{RepairflowError, Result};
use crate::schemas::TicketPatch;
use crate::store::TicketRepository;

use super::Shop;

pub async fn run(cwd: Option<&Path>, id: &str, patch: TicketPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(RepairflowError::Validation(
            "nothing to update; pass --info or --qa".to_string(),
        ));
    }
    let shop = Shop::open(cwd)?;
    let ticket = shop.store.update_fields(id, patch).await?;

    let missing = ticket.missing_info_fields();
    println!(
        "Updated {}: QA {}%, info {}",
        ticket.human_code,
        ticket.qa_progress(),
        if missing.is_empty() {
            "complete".to_string()
        } else {
            format!("missing {}", missing.join(", "))
        }
    );
    Ok(())
}

/// Build a patch from `--info` and `--qa` arguments
pub fn patch_from_args(info: &[(String, String)], qa: &[(String, bool)]) -> TicketPatch {
    let patch = info
        .iter()
        .fold(TicketPatch::default(), |p, (k, v)| p.info(k.as_str(), v.as_str()));
    qa.iter().fold(patch, |p, (k, checked)| p.qa(k.as_str(), *checked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_from_args() {
        let patch = patch_from_args(
            &[("cpu".into(), "i5".into())],
            &[("boot".into(), true), ("keys".into(), false)],
        );
        assert_eq!(patch.additional_info.len(), 1);
        assert_eq!(patch.qa_checklist.get("keys"), Some(&false));
        assert!(patch_from_args(&[], &[]).is_empty());
    }
}
