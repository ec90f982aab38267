//! Starting a move and suspending it behind the info/QA gates
//!
//! When the guard asks for technical info or a finished QA checklist, the
//! caller gets a [`PendingMove`] token. Saving the sub-flow data through the
//! token re-runs the guard on the refreshed ticket; cancelling drops it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{decide, GuardDecision, RuleTable, TransitionForm};
use crate::errors::Result;
use crate::schemas::{Area, MoveKind, Ticket, TicketPatch};
use crate::store::TicketRepository;

use super::executor::ensure_area_changes;

/// Which sub-flow a suspended move is waiting on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PendingStep {
    CollectInfo { missing: Vec<String> },
    CompleteQa { progress: u8 },
}

/// A move suspended by a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub ticket_id: String,
    pub target_area: Area,
    pub step: PendingStep,
}

/// What the caller has to do next
#[derive(Debug)]
pub enum MoveStep {
    /// Execute straight away with this audit kind
    Immediate { ticket: Ticket, kind: MoveKind },
    /// Fill this form, then execute with its payload
    Form { ticket: Ticket, form: TransitionForm },
    /// Complete a sub-flow first
    Suspended(PendingMove),
}

impl MoveStep {
    pub fn is_suspended(&self) -> bool {
        matches!(self, MoveStep::Suspended(_))
    }
}

/// Run the guard for moving `ticket_id` to `target`.
pub async fn begin_move(
    repo: &dyn TicketRepository,
    rules: &RuleTable,
    ticket_id: &str,
    target: Area,
) -> Result<MoveStep> {
    let ticket = repo.load(ticket_id).await?;
    ensure_area_changes(&ticket, target)?;
    Ok(step_for(ticket, target, rules))
}

fn step_for(ticket: Ticket, target: Area, rules: &RuleTable) -> MoveStep {
    let decision = decide(&ticket, ticket.current_area, target, rules);
    debug!(
        ticket = %ticket.id,
        from = %ticket.current_area,
        to = %target,
        decision = %decision.describe(),
        "guard evaluated"
    );

    match decision {
        GuardDecision::Bypass => MoveStep::Immediate {
            ticket,
            kind: MoveKind::Bypass,
        },
        GuardDecision::DirectMove => MoveStep::Immediate {
            ticket,
            kind: MoveKind::Direct,
        },
        GuardDecision::OpenForm(rule) => {
            let form = TransitionForm::open(&ticket, &rule);
            MoveStep::Form { ticket, form }
        }
        GuardDecision::RequireInfo { missing } => MoveStep::Suspended(PendingMove {
            ticket_id: ticket.id,
            target_area: target,
            step: PendingStep::CollectInfo {
                missing: missing.into_iter().map(str::to_string).collect(),
            },
        }),
        GuardDecision::RequireQa { progress } => MoveStep::Suspended(PendingMove {
            ticket_id: ticket.id,
            target_area: target,
            step: PendingStep::CompleteQa { progress },
        }),
    }
}

impl PendingMove {
    /// Re-run the guard against the ticket as currently stored
    pub async fn resume(self, repo: &dyn TicketRepository, rules: &RuleTable) -> Result<MoveStep> {
        begin_move(repo, rules, &self.ticket_id, self.target_area).await
    }

    /// Save the sub-flow's data, then resume
    pub async fn save_and_resume(
        self,
        repo: &dyn TicketRepository,
        rules: &RuleTable,
        patch: TicketPatch,
    ) -> Result<MoveStep> {
        repo.update_fields(&self.ticket_id, patch).await?;
        self.resume(repo, rules).await
    }

    /// Drop the token; the ticket stays where it is
    pub fn cancel(self) {
        info!(
            ticket = %self.ticket_id,
            target = %self.target_area,
            "move cancelled, ticket was not moved"
        );
    }
}
