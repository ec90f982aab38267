//! Move command - Run one ticket through guard, form and executor

use std::path::Path;

use tracing::{info, warn};

use crate::domain::{FormAnswers, RuleTable};
use crate::errors::{RepairflowError, Result};
use crate::fs::read_json;
use crate::schemas::{Area, MoveKind, TicketPatch};
use crate::workflow::{begin_move, AuditMeta, MoveStep, PendingStep};

use super::Shop;

pub struct MoveArgs<'a> {
    pub id: &'a str,
    pub area: Area,
    pub answers: Option<&'a Path>,
    pub actor: Option<&'a str>,
    /// Saved through the pending move if a gate suspends it
    pub patch: TicketPatch,
}

pub async fn run(cwd: Option<&Path>, args: MoveArgs<'_>) -> Result<()> {
    let shop = Shop::open(cwd)?;
    let rules = RuleTable::standard();
    let repo = shop.store.as_ref();

    let mut step = begin_move(repo, &rules, args.id, args.area).await?;
    if let MoveStep::Suspended(pending) = step {
        if args.patch.is_empty() {
            let reason = describe_pending(&pending.step);
            pending.cancel();
            return Err(RepairflowError::Validation(format!(
                "move to {} is waiting on {}; pass --info/--qa to provide it",
                args.area, reason
            )));
        }
        info!(ticket = %args.id, "saving sub-flow data and re-checking");
        step = pending.save_and_resume(repo, &rules, args.patch).await?;
    }

    let (payload, kind) = match step {
        MoveStep::Immediate { kind, .. } => {
            if args.answers.is_some() {
                warn!("--answers ignored: this move needs no form");
            }
            (None, kind)
        }
        MoveStep::Form { form, .. } => {
            let path = args.answers.ok_or_else(|| {
                RepairflowError::Validation(format!(
                    "'{}' form required; pass --answers <file>",
                    form.rule().title
                ))
            })?;
            let answers: FormAnswers = read_json(path)?;
            (Some(answers.fill(form)?), MoveKind::Form)
        }
        MoveStep::Suspended(pending) => {
            let reason = describe_pending(&pending.step);
            pending.cancel();
            return Err(RepairflowError::Validation(format!(
                "move to {} is still waiting on {}",
                args.area, reason
            )));
        }
    };

    let executor = shop.executor();
    let outcome = executor
        .execute(args.id, args.area, payload, AuditMeta::new(shop.actor(args.actor), kind))
        .await?;

    if let Some(handle) = outcome.notification {
        // Let the notice go out before the process exits
        if let Err(e) = handle.await {
            warn!(error = %e, "pickup notice task did not finish");
        }
    }

    println!(
        "Moved {} from {} to {}",
        outcome.ticket.human_code, outcome.audit_entry.previous_area, outcome.ticket.current_area
    );
    Ok(())
}

fn describe_pending(step: &PendingStep) -> String {
    match step {
        PendingStep::CollectInfo { missing } => {
            format!("technical info ({})", missing.join(", "))
        }
        PendingStep::CompleteQa { progress } => format!("QA checklist ({}% done)", progress),
    }
}
