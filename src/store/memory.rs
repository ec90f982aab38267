//! In-memory ticket store, used by tests and dry runs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::errors::{RepairflowError, Result};
use crate::schemas::{Area, AuditEntry, Ticket, TicketPatch};

use super::{publish, ChangeKind, TicketChange, TicketRepository, CHANGE_FEED_CAPACITY};

pub struct MemoryStore {
    tickets: RwLock<BTreeMap<String, Ticket>>,
    audit: RwLock<Vec<AuditEntry>>,
    changes: broadcast::Sender<TicketChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        MemoryStore {
            tickets: RwLock::new(BTreeMap::new()),
            audit: RwLock::new(Vec::new()),
            changes,
        }
    }

    /// Store pre-populated with `tickets`
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let store = MemoryStore::new();
        let map = tickets.into_iter().map(|t| (t.id.clone(), t)).collect();
        MemoryStore {
            tickets: RwLock::new(map),
            ..store
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn load(&self, id: &str) -> Result<Ticket> {
        self.tickets
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepairflowError::TicketNotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        Ok(self.tickets.read().await.values().cloned().collect())
    }

    async fn insert(&self, ticket: Ticket) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(RepairflowError::Store(format!(
                "ticket {} already exists",
                ticket.id
            )));
        }
        publish(&self.changes, ChangeKind::Inserted, &ticket);
        tickets.insert(ticket.id.clone(), ticket);
        Ok(())
    }

    async fn update_fields(&self, id: &str, patch: TicketPatch) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| RepairflowError::TicketNotFound(id.to_string()))?;
        patch.apply(ticket);
        publish(&self.changes, ChangeKind::Updated, ticket);
        Ok(ticket.clone())
    }

    async fn move_ticket(&self, id: &str, target: Area, at: DateTime<Utc>) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| RepairflowError::TicketNotFound(id.to_string()))?;
        let from = ticket.current_area;
        ticket.current_area = target;
        ticket.moved_to_area_at = Some(at);
        publish(&self.changes, ChangeKind::Moved { from, to: target }, ticket);
        Ok(ticket.clone())
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<()> {
        self.audit.write().await.push(entry);
        Ok(())
    }

    async fn audit_log(&self, id: &str) -> Result<Vec<AuditEntry>> {
        Ok(self
            .audit
            .read()
            .await
            .iter()
            .filter(|e| e.ticket_id == id)
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<TicketChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{BudgetStatus, MoveKind};

    #[tokio::test]
    async fn test_insert_and_load() {
        let store = MemoryStore::new();
        store.insert(Ticket::new("t1", "A-001")).await.unwrap();

        assert_eq!(store.load("t1").await.unwrap().human_code, "A-001");
        assert!(matches!(
            store.load("nope").await,
            Err(RepairflowError::TicketNotFound(_))
        ));
        assert!(store.insert(Ticket::new("t1", "A-002")).await.is_err());
    }

    #[tokio::test]
    async fn test_move_and_update_publish_changes() {
        let store = MemoryStore::with_tickets([Ticket::new("t1", "A-001")]);
        let mut feed = store.subscribe();

        let now = Utc::now();
        let moved = store.move_ticket("t1", Area::WaitingBox, now).await.unwrap();
        assert_eq!(moved.current_area, Area::WaitingBox);
        assert_eq!(moved.moved_to_area_at, Some(now));

        let patch = TicketPatch {
            budget_status: Some(BudgetStatus::Pending),
            ..Default::default()
        };
        store.update_fields("t1", patch).await.unwrap();

        let first = feed.recv().await.unwrap();
        assert_eq!(
            first.kind,
            ChangeKind::Moved {
                from: Area::Intake,
                to: Area::WaitingBox
            }
        );
        let second = feed.recv().await.unwrap();
        assert_eq!(second.kind, ChangeKind::Updated);
        assert_eq!(second.ticket.budget.status, BudgetStatus::Pending);
    }

    #[tokio::test]
    async fn test_audit_log_filters_by_ticket() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for id in ["t1", "t2", "t1"] {
            store
                .append_audit(AuditEntry::new(
                    id,
                    "ana",
                    now,
                    Area::Intake,
                    Area::WaitingBox,
                    MoveKind::Direct,
                ))
                .await
                .unwrap();
        }
        assert_eq!(store.audit_log("t1").await.unwrap().len(), 2);
        assert_eq!(store.audit_log("t3").await.unwrap().len(), 0);
    }
}
