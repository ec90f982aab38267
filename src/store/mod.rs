//! Ticket persistence
//!
//! The workflow talks to storage only through [`TicketRepository`]. Writes
//! are last-writer-wins; callers serialize moves per ticket.

mod json;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::errors::Result;
use crate::schemas::{Area, AuditEntry, Ticket, TicketPatch};

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Capacity of the change feed; slow subscribers see `Lagged`
pub const CHANGE_FEED_CAPACITY: usize = 256;

/// What happened to a ticket
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Moved { from: Area, to: Area },
}

/// One entry on the change feed, carrying the ticket as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketChange {
    pub kind: ChangeKind,
    pub ticket: Ticket,
}

/// Storage backend for tickets and their audit trail.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// behind an `Arc` with spawned tasks.
#[async_trait]
pub trait TicketRepository: Send + Sync + 'static {
    /// Returns `TicketNotFound` for an unknown id.
    async fn load(&self, id: &str) -> Result<Ticket>;

    /// All tickets, ordered by id.
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Store a new ticket. Fails if the id is taken.
    async fn insert(&self, ticket: Ticket) -> Result<()>;

    /// Apply a partial update and return the ticket as written.
    async fn update_fields(&self, id: &str, patch: TicketPatch) -> Result<Ticket>;

    /// Set the current area and its entry timestamp.
    async fn move_ticket(&self, id: &str, target: Area, at: DateTime<Utc>) -> Result<Ticket>;

    async fn append_audit(&self, entry: AuditEntry) -> Result<()>;

    /// Audit entries for one ticket, oldest first.
    async fn audit_log(&self, id: &str) -> Result<Vec<AuditEntry>>;

    /// Live feed of ticket writes.
    fn subscribe(&self) -> broadcast::Receiver<TicketChange>;
}

/// Send on the change feed; having no subscribers is not an error.
fn publish(sender: &broadcast::Sender<TicketChange>, kind: ChangeKind, ticket: &Ticket) {
    let _ = sender.send(TicketChange {
        kind,
        ticket: ticket.clone(),
    });
}
