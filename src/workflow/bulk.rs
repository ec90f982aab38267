//! Moving several tickets at once
//!
//! Each ticket goes through the guard and executor on its own. Tickets that
//! need a form or a gate sub-flow are skipped; failures do not roll back
//! tickets already moved.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::RuleTable;
use crate::errors::RepairflowError;
use crate::schemas::Area;

use super::executor::{AuditMeta, MoveExecutor};
use super::pending::{begin_move, MoveStep, PendingStep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub ticket_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub moved: Vec<String>,
    pub skipped: Vec<BulkFailure>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.moved.len() + self.skipped.len() + self.failed.len()
    }

    fn skip(&mut self, ticket_id: &str, reason: impl Into<String>) {
        self.skipped.push(BulkFailure {
            ticket_id: ticket_id.to_string(),
            reason: reason.into(),
        });
    }

    fn fail(&mut self, ticket_id: &str, error: &RepairflowError) {
        warn!(ticket = %ticket_id, error = %error, "bulk move failed");
        self.failed.push(BulkFailure {
            ticket_id: ticket_id.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Move every ticket in `ticket_ids` to `target`, one after another.
pub async fn move_many(
    executor: &MoveExecutor,
    rules: &RuleTable,
    ticket_ids: &[String],
    target: Area,
    actor: &str,
) -> BulkReport {
    let mut report = BulkReport::default();
    let repo = executor.repository().as_ref();

    for id in ticket_ids {
        let step = match begin_move(repo, rules, id, target).await {
            Ok(step) => step,
            Err(e @ RepairflowError::SameArea { .. }) => {
                report.skip(id, e.to_string());
                continue;
            }
            Err(e) => {
                report.fail(id, &e);
                continue;
            }
        };

        match step {
            MoveStep::Immediate { kind, .. } => {
                match executor
                    .execute(id, target, None, AuditMeta::new(actor, kind))
                    .await
                {
                    Ok(_) => report.moved.push(id.clone()),
                    Err(e) => report.fail(id, &e),
                }
            }
            MoveStep::Form { form, .. } => {
                report.skip(id, format!("form required: {}", form.rule().title));
            }
            MoveStep::Suspended(pending) => {
                let reason = match &pending.step {
                    PendingStep::CollectInfo { missing } => {
                        format!("missing technical info: {}", missing.join(", "))
                    }
                    PendingStep::CompleteQa { progress } => format!("QA at {}%", progress),
                };
                report.skip(id, reason);
            }
        }
    }

    info!(
        target_area = %target,
        moved = report.moved.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "bulk move finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;
    use crate::schemas::Ticket;
    use crate::store::{MemoryStore, TicketRepository};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mixed_batch() {
        let store = Arc::new(MemoryStore::with_tickets([
            Ticket::new("ready", "A-001")
                .with_area(Area::WaitingBox)
                .with_complete_info()
                .with_qa_item("boot", true),
            Ticket::new("no-info", "A-002").with_area(Area::WaitingBox),
            Ticket::new("bench", "A-003")
                .with_area(Area::QuickService)
                .with_complete_info()
                .with_qa_item("boot", true),
            Ticket::new("there", "A-004").with_area(Area::AdvertisingBox),
        ]));
        let executor = MoveExecutor::new(store.clone(), Arc::new(LogNotifier), Area::DispatchBox);
        let ids: Vec<String> = ["ready", "no-info", "bench", "there", "ghost"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = move_many(&executor, &RuleTable::standard(), &ids, Area::AdvertisingBox, "ana").await;

        assert_eq!(report.moved, vec!["ready".to_string()]);
        assert_eq!(report.skipped.len(), 3);
        assert!(report.skipped[0].reason.contains("missing technical info"));
        assert!(report.skipped[1].reason.contains("form required"));
        assert_eq!(report.skipped[2].ticket_id, "there");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].ticket_id, "ghost");
        assert_eq!(report.total(), 5);

        assert_eq!(store.load("ready").await.unwrap().current_area, Area::AdvertisingBox);
        assert_eq!(store.load("no-info").await.unwrap().current_area, Area::WaitingBox);
    }
}
