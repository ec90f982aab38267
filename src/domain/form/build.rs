//! Build mode: collect planned actions when entering a service area

use serde::{Deserialize, Serialize};

use crate::domain::validation::validate_hardware_change;
use crate::errors::{RepairflowError, Result};
use crate::schemas::{ActionCategory, HardwareChange, ServiceAction};

/// Problem picked from the option list, or typed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemChoice {
    Listed(String),
    Other(String),
}

/// One action as typed by the operator, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDraft {
    pub problem: ProblemChoice,
    #[serde(default)]
    pub category: ActionCategory,
    pub observation: String,
    pub cost: f64,
    /// Minutes
    pub time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareChange>,
}

/// Projected cost and time of the planned list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectedTotals {
    pub cost: f64,
    /// Minutes, widened so long lists cannot overflow
    pub time: u64,
}

impl ProjectedTotals {
    pub fn of(actions: &[ServiceAction]) -> Self {
        actions.iter().fold(ProjectedTotals::default(), |acc, a| ProjectedTotals {
            cost: acc.cost + a.planned_cost,
            time: acc.time + u64::from(a.planned_time),
        })
    }
}

/// Read-only line item shown before submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub position: usize,
    pub text: String,
    pub category: ActionCategory,
    pub cost: f64,
    pub time: u32,
    pub transferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSummary {
    pub items: Vec<LineItem>,
    pub totals: ProjectedTotals,
}

/// Move the element at `from` to position `to`, returning a new list.
///
/// Out-of-range indices return the list unchanged.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if from >= out.len() || to >= out.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    out.insert(to, item);
    out
}

/// Working list of the action builder sub-form
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBuilder {
    options: Vec<String>,
    actions: Vec<ServiceAction>,
}

impl ActionBuilder {
    pub fn new(options: Vec<String>) -> Self {
        ActionBuilder {
            options,
            actions: Vec::new(),
        }
    }

    /// Start from actions already on the list (transfers or retained work)
    pub fn seeded(options: Vec<String>, actions: Vec<ServiceAction>) -> Self {
        ActionBuilder { options, actions }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn actions(&self) -> &[ServiceAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Validate a draft into an action without adding it
    pub fn check(&self, draft: ActionDraft) -> Result<ServiceAction> {
        let text = match draft.problem {
            ProblemChoice::Listed(option) => {
                if !self.options.contains(&option) {
                    return Err(RepairflowError::Validation(format!(
                        "'{}' is not a listed problem",
                        option
                    )));
                }
                option
            }
            ProblemChoice::Other(text) => text.trim().to_string(),
        };
        if text.is_empty() {
            return Err(RepairflowError::Validation("problem description is empty".into()));
        }
        if draft.observation.trim().is_empty() {
            return Err(RepairflowError::Validation(format!(
                "observation is required for '{}'",
                text
            )));
        }
        if !draft.cost.is_finite() || draft.cost < 0.0 {
            return Err(RepairflowError::Validation(format!(
                "cost for '{}' must be a non-negative number",
                text
            )));
        }
        validate_hardware_change(draft.category, draft.hardware.as_ref()).into_result()?;

        Ok(ServiceAction {
            text,
            category: draft.category,
            observation: draft.observation.trim().to_string(),
            planned_cost: draft.cost,
            planned_time: draft.time,
            hardware_change: draft.hardware,
            transfer: None,
        })
    }

    /// Append a validated action; returns its position
    pub fn add(&mut self, draft: ActionDraft) -> Result<usize> {
        let action = self.check(draft)?;
        self.actions.push(action);
        Ok(self.actions.len() - 1)
    }

    pub fn remove(&mut self, position: usize) -> Result<ServiceAction> {
        if position >= self.actions.len() {
            return Err(RepairflowError::Validation(format!(
                "no action at position {}",
                position
            )));
        }
        Ok(self.actions.remove(position))
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        self.actions = reorder(&self.actions, from, to);
    }

    pub fn totals(&self) -> ProjectedTotals {
        ProjectedTotals::of(&self.actions)
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            items: self
                .actions
                .iter()
                .enumerate()
                .map(|(position, a)| LineItem {
                    position,
                    text: a.text.clone(),
                    category: a.category,
                    cost: a.planned_cost,
                    time: a.planned_time,
                    transferred: a.is_transfer(),
                })
                .collect(),
            totals: self.totals(),
        }
    }

    pub fn into_actions(self) -> Vec<ServiceAction> {
        self.actions
    }
}
