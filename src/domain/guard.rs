//! Guard evaluation for area moves
//!
//! Decides what, if anything, has to happen before a move can be written.

use crate::schemas::{Area, Ticket, TransitionRule};

use super::areas::{is_bypass_pair, is_gated_destination};
use super::rules::RuleTable;

/// Next required step for a requested move
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Advertising <-> dispatch: move immediately
    Bypass,
    /// Technical info must be collected first
    RequireInfo { missing: Vec<&'static str> },
    /// The QA checklist must reach 100% first
    RequireQa { progress: u8 },
    /// The rule's form must be filled
    OpenForm(TransitionRule),
    /// No paperwork for this pair
    DirectMove,
}

impl GuardDecision {
    /// True when the move can be written without any form
    pub fn is_immediate(&self) -> bool {
        matches!(self, GuardDecision::Bypass | GuardDecision::DirectMove)
    }

    /// True when the move must wait for info or QA data
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            GuardDecision::RequireInfo { .. } | GuardDecision::RequireQa { .. }
        )
    }

    pub fn describe(&self) -> String {
        match self {
            GuardDecision::Bypass => "bypass".to_string(),
            GuardDecision::RequireInfo { missing } => {
                format!("missing technical info: {}", missing.join(", "))
            }
            GuardDecision::RequireQa { progress } => format!("QA at {}%", progress),
            GuardDecision::OpenForm(rule) => format!("form required: {}", rule.title),
            GuardDecision::DirectMove => "direct move".to_string(),
        }
    }
}

/// Evaluate the guard for moving `ticket` from `from` to `to`.
///
/// Checks run in order: bypass pair, info gate, QA gate, rule lookup.
/// An unconfigured pair is a direct move, never an error.
pub fn decide(ticket: &Ticket, from: Area, to: Area, rules: &RuleTable) -> GuardDecision {
    if is_bypass_pair(from, to) {
        return GuardDecision::Bypass;
    }

    if is_gated_destination(to) {
        if !ticket.additional_info_complete() {
            return GuardDecision::RequireInfo {
                missing: ticket.missing_info_fields(),
            };
        }
        let progress = ticket.qa_progress();
        if progress < 100 {
            return GuardDecision::RequireQa { progress };
        }
    }

    match rules.rule_for(from, to) {
        Some(rule) => GuardDecision::OpenForm(rule.clone()),
        None => GuardDecision::DirectMove,
    }
}
