//! Move executor
//!
//! Writes a move that already passed the guard (and its form, if any):
//! area change, field patch, audit entry, then the pickup notice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{patch_from_payload, FinalizationPayload};
use crate::errors::{RepairflowError, Result};
use crate::notify::{Notification, Notifier};
use crate::schemas::{Area, AuditEntry, MoveKind, Ticket};
use crate::store::TicketRepository;

/// Who moved the ticket and how it got past the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditMeta {
    pub actor: String,
    pub kind: MoveKind,
}

impl AuditMeta {
    pub fn new(actor: impl Into<String>, kind: MoveKind) -> Self {
        AuditMeta {
            actor: actor.into(),
            kind,
        }
    }
}

/// Result of a written move
#[derive(Debug)]
pub struct MoveOutcome {
    pub ticket: Ticket,
    pub audit_entry: AuditEntry,
    /// Pending pickup notice; awaiting it is optional
    pub notification: Option<JoinHandle<()>>,
}

pub struct MoveExecutor {
    repo: Arc<dyn TicketRepository>,
    notifier: Arc<dyn Notifier>,
    pickup_area: Area,
}

/// Reject a move to the area the ticket already occupies
pub fn ensure_area_changes(ticket: &Ticket, target: Area) -> Result<()> {
    if ticket.current_area == target {
        return Err(RepairflowError::SameArea {
            id: ticket.id.clone(),
            area: target,
        });
    }
    Ok(())
}

/// Reject a form finished for a different pair of areas
pub fn ensure_payload_matches(
    payload: &FinalizationPayload,
    from: Area,
    target: Area,
) -> Result<()> {
    let expected = format!("{}->{}", from, target);
    if payload.rule_key != expected {
        return Err(RepairflowError::Validation(format!(
            "form was completed for {}, not {}",
            payload.rule_key, expected
        )));
    }
    Ok(())
}

impl MoveExecutor {
    pub fn new(
        repo: Arc<dyn TicketRepository>,
        notifier: Arc<dyn Notifier>,
        pickup_area: Area,
    ) -> Self {
        MoveExecutor {
            repo,
            notifier,
            pickup_area,
        }
    }

    pub fn repository(&self) -> &Arc<dyn TicketRepository> {
        &self.repo
    }

    pub fn pickup_area(&self) -> Area {
        self.pickup_area
    }

    pub async fn execute(
        &self,
        ticket_id: &str,
        target: Area,
        payload: Option<FinalizationPayload>,
        meta: AuditMeta,
    ) -> Result<MoveOutcome> {
        self.execute_at(ticket_id, target, payload, meta, Utc::now())
            .await
    }

    /// Write the move with an explicit timestamp.
    ///
    /// Store failures abort the move at the step that failed; earlier
    /// writes are not rolled back.
    pub async fn execute_at(
        &self,
        ticket_id: &str,
        target: Area,
        payload: Option<FinalizationPayload>,
        meta: AuditMeta,
        now: DateTime<Utc>,
    ) -> Result<MoveOutcome> {
        let before = self.repo.load(ticket_id).await?;
        ensure_area_changes(&before, target)?;
        let previous_area = before.current_area;
        if let Some(payload) = &payload {
            ensure_payload_matches(payload, previous_area, target)?;
        }

        let patch = payload
            .as_ref()
            .map(|p| patch_from_payload(&before, p, now))
            .unwrap_or_default();
        let form_data = payload
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepairflowError::InvalidJson(e.to_string()))?;

        let mut ticket = self.repo.move_ticket(ticket_id, target, now).await?;
        if !patch.is_empty() {
            ticket = self.repo.update_fields(ticket_id, patch).await?;
        }

        let audit_entry = AuditEntry::new(
            ticket_id,
            meta.actor,
            now,
            previous_area,
            target,
            meta.kind,
        )
        .with_form_data(form_data);
        self.repo.append_audit(audit_entry.clone()).await?;

        info!(
            ticket = %ticket_id,
            from = %previous_area,
            to = %target,
            actor = %audit_entry.actor,
            "ticket moved"
        );

        let notification = self.spawn_pickup_notice(&ticket);

        Ok(MoveOutcome {
            ticket,
            audit_entry,
            notification,
        })
    }

    fn spawn_pickup_notice(&self, ticket: &Ticket) -> Option<JoinHandle<()>> {
        if ticket.current_area != self.pickup_area {
            return None;
        }
        let contact = match ticket.contact.as_deref().map(str::trim) {
            Some(contact) if !contact.is_empty() => contact.to_string(),
            _ => {
                debug!(ticket = %ticket.id, "no contact on file, skipping pickup notice");
                return None;
            }
        };

        let notifier = Arc::clone(&self.notifier);
        let notification = Notification::ready_for_pickup(ticket);
        let ticket_id = ticket.id.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = notifier.notify(&contact, &notification).await {
                warn!(ticket = %ticket_id, error = %e, "pickup notice failed");
            }
        }))
    }
}
