//! Audit command - Show the move history of a ticket

use std::path::Path;

use crate::errors::Result;
use crate::store::TicketRepository;

use super::{print_json, Shop};

pub async fn run(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let shop = Shop::open(cwd)?;
    // Fail on unknown ids rather than printing an empty log
    shop.store.load(id).await?;
    let entries = shop.store.audit_log(id).await?;

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No moves recorded for {}", id);
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {:<18} -> {:<18} {:<7} by {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.previous_area,
            entry.new_area,
            format!("{:?}", entry.kind).to_lowercase(),
            entry.actor
        );
    }
    Ok(())
}
