//! Bulk-move command - Move several tickets that need no form

use std::path::Path;

use crate::domain::RuleTable;
use crate::errors::{RepairflowError, Result};
use crate::schemas::Area;
use crate::workflow::move_many;

use super::{print_json, Shop};

pub async fn run(
    cwd: Option<&Path>,
    area: Area,
    ids: &[String],
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let executor = shop.executor();
    let report = move_many(
        &executor,
        &RuleTable::standard(),
        ids,
        area,
        &shop.actor(actor),
    )
    .await;

    if json {
        print_json(&report)?;
    } else {
        println!(
            "Moved {} of {} ticket(s) to {}",
            report.moved.len(),
            report.total(),
            area
        );
        for skip in &report.skipped {
            println!("  skipped {}: {}", skip.ticket_id, skip.reason);
        }
        for failure in &report.failed {
            println!("  failed  {}: {}", failure.ticket_id, failure.reason);
        }
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(RepairflowError::Store(format!(
            "{} ticket(s) could not be moved",
            report.failed.len()
        )))
    }
}
