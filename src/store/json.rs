//! File-backed ticket store
//!
//! Layout under the shop root:
//!
//! ```text
//! .repairflow/
//!   tickets/<id>.json   one pretty-printed document per ticket
//!   audit/<id>.jsonl    one line per recorded move
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::errors::{RepairflowError, Result};
use crate::fs::{
    append_json_line, get_audit_path, get_ticket_path, get_tickets_dir, read_json,
    read_json_lines, write_json,
};
use crate::schemas::{Area, AuditEntry, Ticket, TicketPatch};

use super::{publish, ChangeKind, TicketChange, TicketRepository, CHANGE_FEED_CAPACITY};

pub struct JsonStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
    changes: broadcast::Sender<TicketChange>,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        JsonStore {
            root: root.into(),
            write_lock: Mutex::new(()),
            changes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_ticket(&self, id: &str) -> Result<Ticket> {
        read_json(&get_ticket_path(&self.root, id)).map_err(|e| match e {
            RepairflowError::FileNotFound(_) => RepairflowError::TicketNotFound(id.to_string()),
            other => other,
        })
    }

    fn write_ticket(&self, ticket: &Ticket) -> Result<()> {
        write_json(&get_ticket_path(&self.root, &ticket.id), ticket)
            .map_err(|e| RepairflowError::Store(format!("writing ticket {}: {}", ticket.id, e)))
    }
}

#[async_trait]
impl TicketRepository for JsonStore {
    async fn load(&self, id: &str) -> Result<Ticket> {
        self.read_ticket(id)
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let dir = get_tickets_dir(&self.root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths.iter().map(|p| read_json(p)).collect()
    }

    async fn insert(&self, ticket: Ticket) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if get_ticket_path(&self.root, &ticket.id).exists() {
            return Err(RepairflowError::Store(format!(
                "ticket {} already exists",
                ticket.id
            )));
        }
        self.write_ticket(&ticket)?;
        debug!(ticket = %ticket.id, "ticket created");
        publish(&self.changes, ChangeKind::Inserted, &ticket);
        Ok(())
    }

    async fn update_fields(&self, id: &str, patch: TicketPatch) -> Result<Ticket> {
        let _guard = self.write_lock.lock().await;
        let mut ticket = self.read_ticket(id)?;
        patch.apply(&mut ticket);
        self.write_ticket(&ticket)?;
        publish(&self.changes, ChangeKind::Updated, &ticket);
        Ok(ticket)
    }

    async fn move_ticket(&self, id: &str, target: Area, at: DateTime<Utc>) -> Result<Ticket> {
        let _guard = self.write_lock.lock().await;
        let mut ticket = self.read_ticket(id)?;
        let from = ticket.current_area;
        ticket.current_area = target;
        ticket.moved_to_area_at = Some(at);
        self.write_ticket(&ticket)?;
        publish(&self.changes, ChangeKind::Moved { from, to: target }, &ticket);
        Ok(ticket)
    }

    async fn append_audit(&self, entry: AuditEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        append_json_line(&get_audit_path(&self.root, &entry.ticket_id), &entry).map_err(|e| {
            RepairflowError::Store(format!("appending audit for {}: {}", entry.ticket_id, e))
        })
    }

    async fn audit_log(&self, id: &str) -> Result<Vec<AuditEntry>> {
        read_json_lines(&get_audit_path(&self.root, id))
    }

    fn subscribe(&self) -> broadcast::Receiver<TicketChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{MoveKind, ServiceAction};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ticket_round_trip_on_disk() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        let ticket = Ticket::new("t1", "A-001")
            .with_model("Latitude 7490")
            .with_actions(vec![ServiceAction::new("Fan cleaning", "noisy", 10.0, 20)]);

        store.insert(ticket.clone()).await.unwrap();
        assert!(get_ticket_path(temp.path(), "t1").exists());
        assert_eq!(store.load("t1").await.unwrap(), ticket);

        // A second store over the same directory sees the same data
        let reopened = JsonStore::new(temp.path());
        assert_eq!(reopened.list().await.unwrap(), vec![ticket]);
    }

    #[tokio::test]
    async fn test_missing_ticket_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.load("ghost").await,
            Err(RepairflowError::TicketNotFound(_))
        ));
        assert!(matches!(
            store.move_ticket("ghost", Area::RecycleBox, Utc::now()).await,
            Err(RepairflowError::TicketNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_move_update_and_audit_persist() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        store.insert(Ticket::new("t1", "A-001")).await.unwrap();

        let now = Utc::now();
        store.move_ticket("t1", Area::WaitingBox, now).await.unwrap();
        store
            .update_fields("t1", TicketPatch::default().info("cpu", "i5-8350U"))
            .await
            .unwrap();
        store
            .append_audit(AuditEntry::new(
                "t1",
                "ana",
                now,
                Area::Intake,
                Area::WaitingBox,
                MoveKind::Form,
            ))
            .await
            .unwrap();

        let reopened = JsonStore::new(temp.path());
        let ticket = reopened.load("t1").await.unwrap();
        assert_eq!(ticket.current_area, Area::WaitingBox);
        assert_eq!(ticket.additional_info.get("cpu").map(String::as_str), Some("i5-8350U"));

        let log = reopened.audit_log("t1").await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].new_area, Area::WaitingBox);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        store.insert(Ticket::new("t1", "A-001")).await.unwrap();
        let err = store.insert(Ticket::new("t1", "A-001")).await.unwrap_err();
        assert_eq!(err.code(), "STORE_ERROR");
    }
}
