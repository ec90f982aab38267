//! Transition form engine
//!
//! A form is opened from a matched [`TransitionRule`] and walks an explicit
//! state machine:
//!
//! ```text
//! AwaitingExitForm --submit--> AwaitingEntryForm   (service -> service)
//!         |                          |
//!         +--------submit------------+--submit--> Complete
//! ```
//!
//! Leaving a service area starts in the exit stage (resolve mode). Every
//! other form starts in the entry stage (build mode when the rule declares
//! an action builder, plain fields otherwise).

mod answers;
mod build;
mod fields;
mod resolve;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{RepairflowError, Result};
use crate::schemas::{
    Area, BudgetStatus, FieldKind, HardwareConfig, HardwareSwaps, ResolvedAction, ServiceAction, Ticket,
    TransitionRule,
};

use super::areas::is_service_to_service;
use super::validation::{validate_exit_resolution, validate_field_value, validate_required_fields};

pub use answers::{FormAnswers, ResolutionAnswer};
pub use build::{
    reorder, ActionBuilder, ActionDraft, BuildSummary, LineItem, ProblemChoice, ProjectedTotals,
};
pub use fields::FieldValue;
pub use resolve::{HardwareComparison, RealDataAnalysis, Resolution, ResolveEntry, ResolveSheet};

/// Where the form is in its flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStage {
    AwaitingExitForm,
    AwaitingEntryForm,
    Complete,
}

/// What a successful `submit` led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Service -> service: the entry form is now open with transferred actions
    EntryFormOpened { transferred: usize },
    Completed,
}

/// Everything the move executor needs from a finished form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FinalizationPayload {
    pub rule_key: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub resolved_actions: BTreeMap<usize, ResolvedAction>,
    pub real_data_analysis: Option<RealDataAnalysis>,
    pub resolved_hardware: BTreeMap<usize, HardwareConfig>,
    /// The new service's ordered action list, transfers included
    pub new_service_actions: Vec<ServiceAction>,
    /// Open actions kept on the ticket outside the new list
    pub carried_over_actions: Vec<ServiceAction>,
    /// Planned totals of every open action after the move
    pub projected: Option<ProjectedTotals>,
    pub transferred_count: usize,
    pub hardware_swaps: Option<HardwareSwaps>,
    /// True when the ticket's open action list is rewritten by this move
    pub replaces_actions: bool,
}

impl FinalizationPayload {
    /// Re-sum the resolved line items
    pub fn line_item_totals(&self) -> RealDataAnalysis {
        RealDataAnalysis::from_resolved(self.resolved_actions.values())
    }

    pub fn budget_status(&self) -> Option<BudgetStatus> {
        self.fields.values().find_map(FieldValue::as_budget)
    }

    pub fn budget_cost(&self) -> Option<f64> {
        self.projected
            .map(|p| p.cost)
            .or_else(|| self.fields.get("budget_cost").and_then(FieldValue::as_number))
    }

    /// Actions the ticket should hold after the move
    pub fn next_service_actions(&self) -> Vec<ServiceAction> {
        self.new_service_actions
            .iter()
            .chain(self.carried_over_actions.iter())
            .cloned()
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_actions.values().filter(|r| r.resolved).count()
    }
}

/// Read-only view of a form, for review before submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub title: String,
    pub stage: FormStage,
    pub fields: BTreeMap<String, FieldValue>,
    pub analysis: Option<RealDataAnalysis>,
    pub build: Option<BuildSummary>,
    pub transferred_count: usize,
}

/// An open transition form
#[derive(Debug, Clone)]
pub struct TransitionForm {
    rule: TransitionRule,
    stage: FormStage,
    fields: BTreeMap<String, FieldValue>,
    resolve: Option<ResolveSheet>,
    resolution: Option<Resolution>,
    builder: Option<ActionBuilder>,
    carried: Vec<ServiceAction>,
    transferred: usize,
    swaps: Option<HardwareSwaps>,
}

impl TransitionForm {
    /// Open the form for `rule` against the ticket's current data
    pub fn open(ticket: &Ticket, rule: &TransitionRule) -> Self {
        let resolve_mode = rule.has_resolver() && rule.from.is_service();
        let builder = rule.builder_field().map(|field| match &field.kind {
            FieldKind::ActionBuilder { options } => {
                ActionBuilder::new(options.clone())
            }
            _ => ActionBuilder::new(Vec::new()),
        });

        let (stage, resolve, carried) = if resolve_mode {
            (FormStage::AwaitingExitForm, Some(ResolveSheet::new(ticket)), Vec::new())
        } else {
            (FormStage::AwaitingEntryForm, None, ticket.service_actions.clone())
        };

        TransitionForm {
            rule: rule.clone(),
            stage,
            fields: BTreeMap::new(),
            resolve,
            resolution: None,
            // In service -> service moves the builder is created on exit submit
            builder: if resolve_mode && is_service_to_service(rule.from, rule.to) {
                None
            } else {
                builder
            },
            carried,
            transferred: 0,
            swaps: None,
        }
    }

    pub fn rule(&self) -> &TransitionRule {
        &self.rule
    }

    pub fn stage(&self) -> FormStage {
        self.stage
    }

    pub fn from_area(&self) -> Area {
        self.rule.from
    }

    pub fn to_area(&self) -> Area {
        self.rule.to
    }

    fn ensure_open(&self) -> Result<()> {
        if self.stage == FormStage::Complete {
            return Err(RepairflowError::FormStage(
                "form is complete; reopen it to edit".to_string(),
            ));
        }
        Ok(())
    }

    pub fn set_field(&mut self, id: &str, value: FieldValue) -> Result<()> {
        self.ensure_open()?;
        let spec = self
            .rule
            .field(id)
            .ok_or_else(|| RepairflowError::UnknownField(format!("{} (rule {})", id, self.rule.key())))?;
        validate_field_value(spec, &value).into_result()?;
        self.fields.insert(id.to_string(), value);
        Ok(())
    }

    pub fn field(&self, id: &str) -> Option<&FieldValue> {
        self.fields.get(id)
    }

    pub fn set_hardware_swaps(&mut self, swaps: HardwareSwaps) -> Result<()> {
        self.ensure_open()?;
        if !self.rule.has_hardware_swaps() {
            return Err(RepairflowError::UnknownField(format!(
                "hardware swaps (rule {})",
                self.rule.key()
            )));
        }
        self.swaps = Some(swaps);
        Ok(())
    }

    pub fn resolve_sheet(&self) -> Option<&ResolveSheet> {
        self.resolve.as_ref()
    }

    pub fn resolve_sheet_mut(&mut self) -> Result<&mut ResolveSheet> {
        if self.stage != FormStage::AwaitingExitForm {
            return Err(RepairflowError::FormStage(
                "actions can only be resolved in the exit stage".to_string(),
            ));
        }
        self.resolve
            .as_mut()
            .ok_or_else(|| RepairflowError::FormStage("form has no resolve stage".to_string()))
    }

    pub fn builder(&self) -> Option<&ActionBuilder> {
        self.builder.as_ref()
    }

    pub fn builder_mut(&mut self) -> Result<&mut ActionBuilder> {
        if self.stage != FormStage::AwaitingEntryForm {
            return Err(RepairflowError::FormStage(
                "actions can only be added in the entry stage".to_string(),
            ));
        }
        self.builder
            .as_mut()
            .ok_or_else(|| RepairflowError::FormStage("form has no action builder".to_string()))
    }

    /// Validate the current stage and advance
    pub fn submit(&mut self) -> Result<StageOutcome> {
        match self.stage {
            FormStage::AwaitingExitForm => self.submit_exit(),
            FormStage::AwaitingEntryForm => self.submit_entry(),
            FormStage::Complete => Err(RepairflowError::FormStage(
                "form already submitted".to_string(),
            )),
        }
    }

    fn submit_exit(&mut self) -> Result<StageOutcome> {
        let resolution = match &self.resolve {
            Some(sheet) => sheet.finish(),
            None => Resolution::default(),
        };
        validate_exit_resolution(self.rule.to, resolution.unresolved.len()).into_result()?;

        if is_service_to_service(self.rule.from, self.rule.to) {
            let transfers: Vec<ServiceAction> = resolution
                .unresolved
                .iter()
                .map(|a| a.transferred_from(self.rule.from))
                .collect();
            let options = match self.rule.builder_field().map(|f| &f.kind) {
                Some(FieldKind::ActionBuilder { options }) => options.clone(),
                _ => Vec::new(),
            };
            self.transferred = transfers.len();
            if self.transferred > 0 {
                info!(
                    "{} open action(s) transferred from {} to {}",
                    self.transferred, self.rule.from, self.rule.to
                );
            }
            self.builder = Some(ActionBuilder::seeded(options, transfers));
            self.carried.clear();
            self.resolution = Some(resolution);
            self.stage = FormStage::AwaitingEntryForm;
            return Ok(StageOutcome::EntryFormOpened {
                transferred: self.transferred,
            });
        }

        validate_required_fields(&self.rule, &self.fields).into_result()?;
        self.carried = resolution.unresolved.clone();
        self.resolution = Some(resolution);
        self.stage = FormStage::Complete;
        Ok(StageOutcome::Completed)
    }

    fn submit_entry(&mut self) -> Result<StageOutcome> {
        if let (Some(field), Some(builder)) = (self.rule.builder_field(), &self.builder) {
            if builder.is_empty() {
                return Err(RepairflowError::Validation(format!(
                    "{} needs at least one action",
                    field.label
                )));
            }
        }
        validate_required_fields(&self.rule, &self.fields).into_result()?;
        self.stage = FormStage::Complete;
        Ok(StageOutcome::Completed)
    }

    /// Return a completed form to its last editable stage
    pub fn reopen(&mut self) -> Result<()> {
        if self.stage != FormStage::Complete {
            return Err(RepairflowError::FormStage("form is not complete".to_string()));
        }
        if self.builder.is_some() || self.resolve.is_none() {
            self.stage = FormStage::AwaitingEntryForm;
        } else {
            self.resolution = None;
            self.carried.clear();
            self.stage = FormStage::AwaitingExitForm;
        }
        Ok(())
    }

    pub fn summary(&self) -> FormSummary {
        let analysis = match (&self.resolution, &self.resolve) {
            (Some(resolution), _) => Some(resolution.analysis),
            (None, Some(sheet)) => Some(sheet.analysis()),
            (None, None) => None,
        };
        FormSummary {
            title: self.rule.title.clone(),
            stage: self.stage,
            fields: self.fields.clone(),
            analysis,
            build: self.builder.as_ref().map(ActionBuilder::summary),
            transferred_count: self.transferred,
        }
    }

    /// Produce the payload of a completed form
    pub fn finalize(self) -> Result<FinalizationPayload> {
        if self.stage != FormStage::Complete {
            return Err(RepairflowError::FormStage(format!(
                "cannot finalize form in stage {:?}",
                self.stage
            )));
        }
        let replaces_actions = self.resolve.is_some() || self.builder.is_some();
        let resolution = self.resolution.unwrap_or_default();
        // Budget covers retained open work too
        let projected = self.builder.as_ref().map(|builder| {
            let listed = builder.totals();
            let carried = ProjectedTotals::of(&self.carried);
            ProjectedTotals {
                cost: listed.cost + carried.cost,
                time: listed.time + carried.time,
            }
        });

        Ok(FinalizationPayload {
            rule_key: self.rule.key(),
            fields: self.fields,
            real_data_analysis: self.resolve.as_ref().map(|_| resolution.analysis),
            resolved_actions: resolution.resolved_actions,
            resolved_hardware: resolution.resolved_hardware,
            new_service_actions: self
                .builder
                .map(ActionBuilder::into_actions)
                .unwrap_or_default(),
            carried_over_actions: if replaces_actions {
                self.carried
            } else {
                Vec::new()
            },
            projected,
            transferred_count: self.transferred,
            hardware_swaps: self.swaps,
            replaces_actions,
        })
    }
}
