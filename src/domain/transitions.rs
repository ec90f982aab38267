//! Move application
//!
//! Pure functions turning a finished form into ticket changes. The move
//! executor writes these through the repository; tests and previews apply
//! them in memory.

use chrono::{DateTime, Utc};

use crate::schemas::{Area, CompletedAction, Ticket, TicketPatch};

use super::form::FinalizationPayload;

/// Field changes a payload makes to `ticket`, whose current area is the one being left.
pub fn patch_from_payload(
    ticket: &Ticket,
    payload: &FinalizationPayload,
    now: DateTime<Utc>,
) -> TicketPatch {
    let append_history = payload
        .resolved_actions
        .values()
        .filter(|r| r.resolved)
        .map(|r| CompletedAction {
            action: r.action.clone(),
            area: ticket.current_area,
            real_cost: r.real_cost,
            real_time: r.real_time,
            resolved_at: now,
        })
        .collect();

    // Later actions win when several touch the same module list
    let hardware = if payload.resolved_hardware.is_empty() {
        None
    } else {
        let mut hardware = ticket.hardware.clone();
        for (index, final_state) in &payload.resolved_hardware {
            let change = payload
                .resolved_actions
                .get(index)
                .and_then(|r| r.action.hardware_change.as_ref());
            match change {
                Some(change) => {
                    if change.ram_config.is_some() {
                        hardware.ram = final_state.ram.clone();
                    }
                    if change.disk_config.is_some() {
                        hardware.disk = final_state.disk.clone();
                    }
                }
                None => hardware = final_state.clone(),
            }
        }
        Some(hardware)
    };

    TicketPatch {
        service_actions: payload
            .replaces_actions
            .then(|| payload.next_service_actions()),
        append_history,
        budget_status: payload.budget_status(),
        budget_cost: payload.budget_cost(),
        hardware,
        hardware_swaps: payload.hardware_swaps.clone(),
        ..TicketPatch::default()
    }
}

/// The ticket as it will look after moving to `target` at `now`.
///
/// Never mutates its input.
pub fn apply_move(
    ticket: &Ticket,
    target: Area,
    payload: Option<&FinalizationPayload>,
    now: DateTime<Utc>,
) -> Ticket {
    let mut next = ticket.clone();
    if let Some(payload) = payload {
        patch_from_payload(ticket, payload, now).apply(&mut next);
    }
    next.current_area = target;
    next.moved_to_area_at = Some(now);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{FieldValue, TransitionForm};
    use crate::domain::rules::RuleTable;
    use crate::schemas::{BudgetStatus, HardwareChange, HardwareConfig, ServiceAction, SlotConfig};

    fn hardware_ticket() -> Ticket {
        let ram = ServiceAction::new("RAM upgrade", "one slot", 30.0, 15).with_hardware_change(
            HardwareChange {
                ram_config: Some(SlotConfig::new(vec!["8GB".into(), "8GB".into()])),
                disk_config: None,
            },
        );
        Ticket::new("t1", "A-001")
            .with_area(Area::QuickService)
            .with_hardware(HardwareConfig {
                ram: vec!["8GB".into()],
                disk: vec!["HDD 500GB".into()],
            })
            .with_actions(vec![
                ram,
                ServiceAction::new("Keyboard replacement", "missing keys", 25.0, 30),
            ])
    }

    #[test]
    fn test_apply_move_resolves_into_history() {
        let ticket = hardware_ticket();
        let rules = RuleTable::standard();
        let mut form =
            TransitionForm::open(&ticket, rules.rule_for(Area::QuickService, Area::DispatchBox).unwrap());
        let sheet = form.resolve_sheet_mut().unwrap();
        sheet.resolve_all();
        sheet.set_real_cost(1, 28.0).unwrap();
        form.submit().unwrap();
        let payload = form.finalize().unwrap();

        let now = Utc::now();
        let next = apply_move(&ticket, Area::DispatchBox, Some(&payload), now);

        assert_eq!(next.current_area, Area::DispatchBox);
        assert_eq!(next.moved_to_area_at, Some(now));
        assert!(next.service_actions.is_empty());
        assert_eq!(next.service_history.len(), 2);
        assert_eq!(next.service_history[1].real_cost, 28.0);
        assert_eq!(next.service_history[0].area, Area::QuickService);
        assert_eq!(next.hardware.ram, vec!["8GB".to_string(), "8GB".to_string()]);
        assert_eq!(next.hardware.disk, vec!["HDD 500GB".to_string()]);
        // Input untouched
        assert_eq!(ticket.current_area, Area::QuickService);
        assert_eq!(ticket.service_actions.len(), 2);
    }

    #[test]
    fn test_apply_move_without_payload() {
        let ticket = hardware_ticket();
        let now = Utc::now();
        let next = apply_move(&ticket, Area::RecycleBox, None, now);
        assert_eq!(next.current_area, Area::RecycleBox);
        assert_eq!(next.service_actions, ticket.service_actions);
    }

    #[test]
    fn test_plain_form_leaves_actions_alone() {
        let ticket = Ticket::new("t1", "A-001")
            .with_actions(vec![ServiceAction::new("Hinge", "loose", 10.0, 20)]);
        let rules = RuleTable::standard();
        let mut form =
            TransitionForm::open(&ticket, rules.rule_for(Area::Intake, Area::WaitingBox).unwrap());
        form.set_field("reason", FieldValue::Choice("Awaiting parts".into()))
            .unwrap();
        form.set_field("budget_status", FieldValue::Budget(BudgetStatus::Pending))
            .unwrap();
        form.submit().unwrap();
        let payload = form.finalize().unwrap();

        let patch = patch_from_payload(&ticket, &payload, Utc::now());
        assert!(patch.service_actions.is_none());
        assert_eq!(patch.budget_status, Some(BudgetStatus::Pending));
        assert!(patch.append_history.is_empty());
    }
}
