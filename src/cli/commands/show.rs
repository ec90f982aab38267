//! Show command - Show details of a ticket

use std::path::Path;

use chrono::Utc;

use crate::domain::format_duration;
use crate::errors::Result;
use crate::store::TicketRepository;

use super::{print_json, Shop};

pub async fn run(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let ticket = shop.store.load(id).await?;

    if json {
        return print_json(&ticket);
    }

    let report = shop.sla_policy()?.status(&ticket, Utc::now());

    println!("{} ({})", ticket.human_code, ticket.id);
    if !ticket.model_name.is_empty() {
        println!("  Model:    {}", ticket.model_name);
    }
    if let Some(contact) = &ticket.contact {
        println!("  Contact:  {}", contact);
    }
    println!("  Area:     {} since {}", ticket.current_area, ticket.area_entered_at());
    match report.remaining {
        Some(remaining) => println!(
            "  SLA:      {} ({} elapsed, {} left)",
            report.status,
            format_duration(report.elapsed),
            format_duration(remaining)
        ),
        None => println!("  SLA:      {}", report.status),
    }
    println!("  Budget:   {} {:.2}", ticket.budget.status, ticket.budget.cost);
    println!("  QA:       {}%", ticket.qa_progress());

    let missing = ticket.missing_info_fields();
    if !missing.is_empty() {
        println!("  Missing:  {}", missing.join(", "));
    }
    if !ticket.hardware.ram.is_empty() || !ticket.hardware.disk.is_empty() {
        println!(
            "  Hardware: RAM [{}] Disk [{}]",
            ticket.hardware.ram.join(", "),
            ticket.hardware.disk.join(", ")
        );
    }

    if !ticket.service_actions.is_empty() {
        println!("\nOpen actions:");
        for (i, action) in ticket.service_actions.iter().enumerate() {
            let transfer = action
                .transfer
                .as_ref()
                .map(|t| format!(" [from {}]", t.from_area))
                .unwrap_or_default();
            println!(
                "  {}. {} ({}) {:.2} / {}m{}",
                i + 1,
                action.text,
                action.category,
                action.planned_cost,
                action.planned_time,
                transfer
            );
        }
    }

    if !ticket.service_history.is_empty() {
        println!("\nHistory:");
        for done in &ticket.service_history {
            println!(
                "  {} in {}: {:.2} / {}m",
                done.action.text, done.area, done.real_cost, done.real_time
            );
        }
    }
    Ok(())
}
