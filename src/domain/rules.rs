//! Transition rule table
//!
//! Static lookup from an ordered area pair to the form that must be filled
//! before the move. Pairs without a rule are plain moves.

use std::collections::HashMap;

use crate::schemas::{Area, FieldKind, FieldSpec, TransitionRule};

/// Problems offered by the action builder
pub const PROBLEM_OPTIONS: &[&str] = &[
    "Screen replacement",
    "Battery replacement",
    "Keyboard replacement",
    "Hinge repair",
    "RAM upgrade",
    "Disk upgrade",
    "Thermal paste",
    "Fan cleaning",
    "OS reinstall",
    "Motherboard repair",
];

/// Reasons offered when parking a ticket straight from intake
pub const WAITING_REASONS: &[&str] = &["Awaiting parts", "Awaiting customer", "Awaiting quote"];

fn options(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn action_builder() -> FieldSpec {
    FieldSpec::new(
        "actions",
        "Planned actions",
        FieldKind::ActionBuilder {
            options: options(PROBLEM_OPTIONS),
        },
    )
    .required()
}

fn action_resolver() -> FieldSpec {
    FieldSpec::new("resolution", "Resolve open actions", FieldKind::ActionResolver)
}

fn budget_status() -> FieldSpec {
    FieldSpec::new("budget_status", "Parts budget", FieldKind::BudgetStatusSelector)
}

/// Lookup table keyed by `(from, to)`
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<(Area, Area), TransitionRule>,
}

impl RuleTable {
    pub fn empty() -> Self {
        RuleTable::default()
    }

    /// The shop's built-in paperwork
    pub fn standard() -> Self {
        let mut table = RuleTable::empty();

        for from in [Area::Intake, Area::WaitingBox, Area::AdvertisingBox] {
            for to in [Area::QuickService, Area::DedicatedService] {
                table.insert(TransitionRule::new(
                    from,
                    to,
                    format!("Send to {}", to),
                    vec![action_builder(), budget_status()],
                ));
            }
        }

        for (from, to) in [
            (Area::QuickService, Area::DedicatedService),
            (Area::DedicatedService, Area::QuickService),
        ] {
            table.insert(TransitionRule::new(
                from,
                to,
                format!("Transfer to {}", to),
                vec![action_resolver(), action_builder()],
            ));
        }

        for from in [Area::QuickService, Area::DedicatedService] {
            for to in [Area::AdvertisingBox, Area::DispatchBox] {
                table.insert(TransitionRule::new(
                    from,
                    to,
                    format!("Finish service and move to {}", to),
                    vec![
                        action_resolver(),
                        FieldSpec::new("swaps", "Component swaps", FieldKind::HardwareSwaps),
                        FieldSpec::new("notes", "Notes", FieldKind::TextArea),
                    ],
                ));
            }

            table.insert(TransitionRule::new(
                from,
                Area::WaitingBox,
                "Park waiting for parts",
                vec![
                    action_resolver(),
                    budget_status().required(),
                    FieldSpec::new("part", "Requested part", FieldKind::Text).required(),
                    FieldSpec::new("budget_cost", "Part cost", FieldKind::Number),
                ],
            ));
        }

        table.insert(TransitionRule::new(
            Area::Intake,
            Area::WaitingBox,
            "Park from intake",
            vec![
                FieldSpec::new(
                    "reason",
                    "Reason",
                    FieldKind::Select {
                        options: options(WAITING_REASONS),
                    },
                )
                .required(),
                budget_status(),
            ],
        ));

        for from in [
            Area::Intake,
            Area::QuickService,
            Area::DedicatedService,
            Area::WaitingBox,
        ] {
            table.insert(TransitionRule::new(
                from,
                Area::RecycleBox,
                "Write off",
                vec![FieldSpec::new("reason", "Reason", FieldKind::TextArea).required()],
            ));
        }

        table
    }

    /// Add or replace the rule for its pair
    pub fn insert(&mut self, rule: TransitionRule) -> Option<TransitionRule> {
        self.rules.insert((rule.from, rule.to), rule)
    }

    pub fn rule_for(&self, from: Area, to: Area) -> Option<&TransitionRule> {
        self.rules.get(&(from, to))
    }

    /// Lookup by the `"{from}->{to}"` key
    pub fn rule_by_key(&self, key: &str) -> Option<&TransitionRule> {
        let (from, to) = key.split_once("->")?;
        self.rule_for(from.trim().parse().ok()?, to.trim().parse().ok()?)
    }

    /// Rules in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
