//! Audit schema - append-only record of area moves

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::Area;

/// How a move got past the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Bypass,
    Direct,
    Form,
}

/// One recorded move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub event_id: Uuid,
    pub ticket_id: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub previous_area: Area,
    pub new_area: Area,
    pub kind: MoveKind,
    /// Snapshot of the submitted form, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(
        ticket_id: impl Into<String>,
        actor: impl Into<String>,
        timestamp: DateTime<Utc>,
        previous_area: Area,
        new_area: Area,
        kind: MoveKind,
    ) -> Self {
        AuditEntry {
            event_id: Uuid::new_v4(),
            ticket_id: ticket_id.into(),
            actor: actor.into(),
            timestamp,
            previous_area,
            new_area,
            kind,
            form_data: None,
        }
    }

    pub fn with_form_data(mut self, form_data: Option<serde_json::Value>) -> Self {
        self.form_data = form_data;
        self
    }
}
