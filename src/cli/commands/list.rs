//! List command - List tickets with optional area filter

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{format_duration, get_area_index, SlaPolicy, SlaStatus};
use crate::errors::Result;
use crate::schemas::{Area, Ticket};
use crate::store::TicketRepository;

use super::{print_json, Shop};

#[derive(Debug, Serialize)]
struct ListRow {
    id: String,
    code: String,
    model: String,
    area: Area,
    open_actions: usize,
    sla: SlaStatus,
    remaining: Option<String>,
}

fn rows(tickets: Vec<Ticket>, area: Option<Area>, policy: &SlaPolicy) -> Vec<ListRow> {
    let now = Utc::now();
    let mut rows: Vec<ListRow> = tickets
        .into_iter()
        .filter(|t| area.map_or(true, |a| t.current_area == a))
        .map(|t| {
            let report = policy.status(&t, now);
            ListRow {
                open_actions: t.service_actions.len(),
                sla: report.status,
                remaining: report.remaining.map(format_duration),
                area: t.current_area,
                model: t.model_name,
                code: t.human_code,
                id: t.id,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        get_area_index(a.area)
            .cmp(&get_area_index(b.area))
            .then_with(|| a.code.cmp(&b.code))
    });
    rows
}

pub async fn run(cwd: Option<&Path>, json: bool, area: Option<Area>) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let policy = shop.sla_policy()?;
    let rows = rows(shop.store.list().await?, area, &policy);

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No tickets");
        return Ok(());
    }

    println!(
        "{:<10} {:<18} {:<24} {:>4} {:<8} {}",
        "CODE", "AREA", "MODEL", "OPEN", "SLA", "REMAINING"
    );
    for row in &rows {
        println!(
            "{:<10} {:<18} {:<24} {:>4} {:<8} {}",
            row.code,
            row.area,
            row.model,
            row.open_actions,
            row.sla,
            row.remaining.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_filter_and_order() {
        let tickets = vec![
            Ticket::new("t2", "B-002").with_area(Area::DispatchBox),
            Ticket::new("t1", "A-001").with_area(Area::QuickService),
            Ticket::new("t3", "A-003").with_area(Area::QuickService),
        ];
        let all = rows(tickets.clone(), None, &SlaPolicy::default());
        let codes: Vec<&str> = all.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A-001", "A-003", "B-002"]);

        let bench = rows(tickets, Some(Area::QuickService), &SlaPolicy::default());
        assert_eq!(bench.len(), 2);
        assert!(bench.iter().all(|r| r.remaining.is_some()));
    }
}
