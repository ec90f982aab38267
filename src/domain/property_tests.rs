//! Property-based tests for domain logic
//!
//! These tests use proptest to verify invariants across many random inputs.

#[cfg(test)]
mod tests {
    use crate::domain::areas::{is_bypass_pair, ALL_AREAS};
    use crate::domain::form::{reorder, FormStage, StageOutcome, TransitionForm};
    use crate::domain::guard::{decide, GuardDecision};
    use crate::domain::rules::RuleTable;
    use crate::domain::sla::SlaPolicy;
    use crate::domain::transitions::apply_move;
    use crate::schemas::{Area, ServiceAction, Ticket};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    // ===== STRATEGY HELPERS =====

    fn any_area() -> impl Strategy<Value = Area> {
        prop::sample::select(ALL_AREAS.to_vec())
    }

    /// Costs in whole cents so sums stay representable
    fn any_action() -> impl Strategy<Value = ServiceAction> {
        ("[A-Z][a-z]{2,10}", 0u32..50_000, 0u32..600).prop_map(|(text, cents, minutes)| {
            ServiceAction::new(text, "observed", f64::from(cents) / 100.0, minutes)
        })
    }

    fn any_checklist() -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), 0..20)
    }

    /// A ticket with random info completeness and QA progress
    fn any_ticket() -> impl Strategy<Value = Ticket> {
        (any_area(), any::<bool>(), any_checklist()).prop_map(|(area, complete, checks)| {
            let mut ticket = Ticket::new("t1", "A-001").with_area(area);
            if complete {
                ticket = ticket.with_complete_info();
            }
            for (i, checked) in checks.into_iter().enumerate() {
                ticket = ticket.with_qa_item(format!("item-{}", i), checked);
            }
            ticket
        })
    }

    // ===== TICKET DERIVED FIELDS =====

    proptest! {
        #[test]
        fn test_qa_progress_formula(checks in any_checklist()) {
            let mut ticket = Ticket::new("t1", "A-001");
            for (i, checked) in checks.iter().enumerate() {
                ticket = ticket.with_qa_item(format!("item-{}", i), *checked);
            }
            let expected = if checks.is_empty() {
                0
            } else {
                let checked = checks.iter().filter(|c| **c).count();
                (100.0 * checked as f64 / checks.len() as f64).round() as u8
            };
            prop_assert_eq!(ticket.qa_progress(), expected);
        }
    }

    // ===== GUARD =====

    proptest! {
        /// Moves into advertising/dispatch are gated unless they are the bypass pair
        #[test]
        fn test_exit_gates_except_bypass(ticket in any_ticket(), to in prop_oneof![Just(Area::AdvertisingBox), Just(Area::DispatchBox)]) {
            let rules = RuleTable::standard();
            let from = ticket.current_area;
            let decision = decide(&ticket, from, to, &rules);

            if is_bypass_pair(from, to) {
                prop_assert_eq!(decision, GuardDecision::Bypass);
            } else if !ticket.additional_info_complete() {
                let is_require_info = matches!(decision, GuardDecision::RequireInfo { .. });
                prop_assert!(is_require_info);
            } else if ticket.qa_progress() < 100 {
                prop_assert_eq!(decision, GuardDecision::RequireQa { progress: ticket.qa_progress() });
            } else {
                prop_assert!(!decision.is_gate());
            }
        }

        /// Destinations outside the exit areas are never gated
        #[test]
        fn test_non_exit_never_gated(ticket in any_ticket(), to in any_area()) {
            prop_assume!(!to.is_exit());
            let rules = RuleTable::standard();
            let decision = decide(&ticket, ticket.current_area, to, &rules);
            prop_assert!(!decision.is_gate());
        }
    }

    // ===== FORM ENGINE =====

    proptest! {
        /// Exiting a service area succeeds only when every open action is resolved
        #[test]
        fn test_exit_requires_full_resolution(first in any::<bool>(), second in any::<bool>(), a in any_action(), b in any_action()) {
            let ticket = Ticket::new("t1", "A-001")
                .with_area(Area::QuickService)
                .with_actions(vec![a, b]);
            let rules = RuleTable::standard();
            let rule = rules.rule_for(Area::QuickService, Area::DispatchBox).unwrap();
            let mut form = TransitionForm::open(&ticket, rule);
            let sheet = form.resolve_sheet_mut().unwrap();
            sheet.set_resolved(0, first).unwrap();
            sheet.set_resolved(1, second).unwrap();

            let result = form.submit();
            if first && second {
                prop_assert_eq!(result.unwrap(), StageOutcome::Completed);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(form.stage(), FormStage::AwaitingExitForm);
            }
        }

        /// Every action left unresolved on a service-to-service move is transferred
        #[test]
        fn test_unresolved_actions_transfer(actions in prop::collection::vec((any_action(), any::<bool>()), 0..8)) {
            let ticket = Ticket::new("t1", "A-001")
                .with_area(Area::QuickService)
                .with_actions(actions.iter().map(|(a, _)| a.clone()).collect());
            let rules = RuleTable::standard();
            let rule = rules.rule_for(Area::QuickService, Area::DedicatedService).unwrap();
            let mut form = TransitionForm::open(&ticket, rule);
            let sheet = form.resolve_sheet_mut().unwrap();
            for (i, (_, resolved)) in actions.iter().enumerate() {
                sheet.set_resolved(i, *resolved).unwrap();
            }
            let open = actions.iter().filter(|(_, resolved)| !resolved).count();

            prop_assert_eq!(form.submit().unwrap(), StageOutcome::EntryFormOpened { transferred: open });
            let builder = form.builder().unwrap();
            prop_assert_eq!(builder.len(), open);
            prop_assert!(builder
                .actions()
                .iter()
                .all(|a| a.transfer.as_ref().map(|t| t.from_area) == Some(Area::QuickService)));
        }

        /// Re-summing a payload's line items reproduces its analysis exactly
        #[test]
        fn test_payload_line_items_round_trip(actions in prop::collection::vec(any_action(), 0..8), real in prop::collection::vec(0u32..50_000, 8)) {
            let ticket = Ticket::new("t1", "A-001")
                .with_area(Area::DedicatedService)
                .with_actions(actions.clone());
            let rules = RuleTable::standard();
            let rule = rules.rule_for(Area::DedicatedService, Area::AdvertisingBox).unwrap();
            let mut form = TransitionForm::open(&ticket, rule);
            let sheet = form.resolve_sheet_mut().unwrap();
            sheet.resolve_all();
            for i in 0..actions.len() {
                sheet.set_real_cost(i, f64::from(real[i]) / 100.0).unwrap();
            }
            form.submit().unwrap();

            let payload = form.finalize().unwrap();
            let analysis = payload.real_data_analysis.unwrap();
            prop_assert_eq!(payload.line_item_totals(), analysis);
            prop_assert_eq!(analysis.diff_cost, analysis.real_cost - analysis.budget_cost);
        }

        #[test]
        fn test_reorder_is_a_permutation(list in prop::collection::vec(0u8..100, 0..10), from in 0usize..12, to in 0usize..12) {
            let moved = reorder(&list, from, to);
            prop_assert_eq!(moved.len(), list.len());

            let mut a = moved.clone();
            let mut b = list.clone();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);

            if from < list.len() && to < list.len() {
                prop_assert_eq!(moved[to], list[from]);
            } else {
                prop_assert_eq!(moved, list);
            }
        }
    }

    // ===== MOVE APPLICATION =====

    proptest! {
        /// apply_move never mutates its input
        #[test]
        fn test_apply_move_never_mutates(ticket in any_ticket(), to in any_area()) {
            let original = ticket.clone();
            let next = apply_move(&ticket, to, None, Utc::now());
            prop_assert_eq!(&ticket, &original);
            prop_assert_eq!(next.current_area, to);
        }
    }

    // ===== SLA =====

    proptest! {
        #[test]
        fn test_sla_status_is_idempotent(area in any_area(), entered_hours in 0i64..2000, now_hours in 0i64..2000) {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let mut ticket = Ticket::new("t1", "A-001").with_area(area);
            ticket.created_at = base;
            ticket.moved_to_area_at = Some(base + Duration::hours(entered_hours));
            let now = base + Duration::hours(now_hours);

            let policy = SlaPolicy::default();
            prop_assert_eq!(policy.status(&ticket, now), policy.status(&ticket, now));
        }

        /// Business time never exceeds wall-clock time and never goes negative
        #[test]
        fn test_business_elapsed_bounded(start_min in 0i64..100_000, span_min in -1000i64..100_000) {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let start = base + Duration::minutes(start_min);
            let end = start + Duration::minutes(span_min);
            let elapsed = SlaPolicy::default().business_elapsed(start, end);

            prop_assert!(elapsed >= Duration::zero());
            prop_assert!(elapsed <= Duration::minutes(span_min.max(0)));
        }
    }
}
