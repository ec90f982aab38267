//! SLA command - Time budget report across the shop

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{format_duration, SlaPolicy, SlaStatus};
use crate::errors::Result;
use crate::schemas::{Area, Ticket};
use crate::store::TicketRepository;

use super::{print_json, Shop};

#[derive(Debug, Serialize)]
struct SlaRow {
    id: String,
    code: String,
    area: Area,
    status: SlaStatus,
    elapsed_minutes: i64,
    remaining_minutes: Option<i64>,
}

/// Danger first, then warning, then ok; most overdue first within a status
fn report(tickets: &[Ticket], policy: &SlaPolicy, now: DateTime<Utc>) -> Vec<SlaRow> {
    let mut rows: Vec<SlaRow> = tickets
        .iter()
        .filter_map(|t| {
            let r = policy.status(t, now);
            (r.status != SlaStatus::Na).then(|| SlaRow {
                id: t.id.clone(),
                code: t.human_code.clone(),
                area: t.current_area,
                status: r.status,
                elapsed_minutes: r.elapsed.num_minutes(),
                remaining_minutes: r.remaining.map(|d| d.num_minutes()),
            })
        })
        .collect();

    let rank = |s: SlaStatus| match s {
        SlaStatus::Danger => 0,
        SlaStatus::Warning => 1,
        SlaStatus::Ok => 2,
        SlaStatus::Na => 3,
    };
    rows.sort_by_key(|r| (rank(r.status), r.remaining_minutes.unwrap_or(i64::MAX)));
    rows
}

pub async fn run(cwd: Option<&Path>, json: bool) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let policy = shop.sla_policy()?;
    let tickets = shop.store.list().await?;
    let rows = report(&tickets, &policy, Utc::now());

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No tickets with a time budget");
        return Ok(());
    }
    for row in &rows {
        let remaining = row
            .remaining_minutes
            .map(|m| format_duration(chrono::Duration::minutes(m)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<10} {:<18} {}",
            row.status, row.code, row.area, remaining
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_report_orders_by_urgency() {
        // Monday
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let entered = |id: &str, area: Area, hours_ago: i64| {
            let mut t = Ticket::new(id, id).with_area(area);
            t.created_at = start - Duration::days(30);
            t.moved_to_area_at = Some(start + Duration::hours(72 - hours_ago));
            t
        };
        let now = start + Duration::hours(72);
        let tickets = vec![
            entered("fresh", Area::DedicatedService, 1),
            entered("late", Area::QuickService, 50),
            entered("close", Area::DedicatedService, 70),
            entered("listed", Area::AdvertisingBox, 60),
        ];

        let rows = report(&tickets, &SlaPolicy::default(), now);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "close", "fresh"]);
        assert_eq!(rows[0].status, SlaStatus::Danger);
        assert_eq!(rows[1].status, SlaStatus::Warning);
    }
}
