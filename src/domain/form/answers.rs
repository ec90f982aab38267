//! Pre-recorded form answers
//!
//! Lets a caller without an interactive UI (the CLI, scripted imports) drive
//! a form from a JSON document through the same validation as a live form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{RepairflowError, Result};
use crate::schemas::{HardwareConfig, HardwareSwaps};

use super::{ActionDraft, FieldValue, FinalizationPayload, FormStage, TransitionForm};

/// Operator input for one open action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionAnswer {
    pub index: usize,
    #[serde(default = "default_true")]
    pub resolved: bool,
    #[serde(default)]
    pub real_cost: Option<f64>,
    #[serde(default)]
    pub real_time: Option<u32>,
    #[serde(default)]
    pub final_hardware: Option<HardwareConfig>,
}

fn default_true() -> bool {
    true
}

/// A complete set of answers for one transition form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormAnswers {
    /// Plain field values keyed by field id
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,

    /// Mark every open action resolved at planned values
    #[serde(default)]
    pub resolve_all: bool,

    #[serde(default)]
    pub resolutions: Vec<ResolutionAnswer>,

    /// Actions to append in the entry stage
    #[serde(default)]
    pub actions: Vec<ActionDraft>,

    #[serde(default)]
    pub hardware_swaps: Option<HardwareSwaps>,
}

impl FormAnswers {
    fn apply_fields(&self, form: &mut TransitionForm) -> Result<()> {
        for (id, raw) in &self.fields {
            let spec = form
                .rule()
                .field(id)
                .ok_or_else(|| RepairflowError::UnknownField(id.clone()))?;
            let value = FieldValue::from_json(spec, raw)?;
            form.set_field(id, value)?;
        }
        if let Some(swaps) = &self.hardware_swaps {
            form.set_hardware_swaps(swaps.clone())?;
        }
        Ok(())
    }

    fn apply_resolutions(&self, form: &mut TransitionForm) -> Result<()> {
        let sheet = form.resolve_sheet_mut()?;
        if self.resolve_all {
            sheet.resolve_all();
        }
        for answer in &self.resolutions {
            sheet.set_resolved(answer.index, answer.resolved)?;
            if let Some(cost) = answer.real_cost {
                sheet.set_real_cost(answer.index, cost)?;
            }
            if let Some(minutes) = answer.real_time {
                sheet.set_real_time(answer.index, minutes)?;
            }
            if let Some(hardware) = &answer.final_hardware {
                sheet.confirm_hardware(answer.index, hardware.clone())?;
            }
        }
        Ok(())
    }

    fn apply_actions(&self, form: &mut TransitionForm) -> Result<()> {
        if self.actions.is_empty() {
            return Ok(());
        }
        let builder = form.builder_mut()?;
        for draft in &self.actions {
            builder.add(draft.clone())?;
        }
        Ok(())
    }

    /// Run the form to completion and return its payload
    pub fn fill(&self, mut form: TransitionForm) -> Result<FinalizationPayload> {
        self.apply_fields(&mut form)?;

        if form.stage() == FormStage::AwaitingExitForm {
            self.apply_resolutions(&mut form)?;
            form.submit()?;
        } else if self.resolve_all || !self.resolutions.is_empty() {
            return Err(RepairflowError::Validation(format!(
                "rule {} has no actions to resolve",
                form.rule().key()
            )));
        }

        if form.stage() == FormStage::AwaitingEntryForm {
            self.apply_actions(&mut form)?;
            form.submit()?;
        } else if !self.actions.is_empty() {
            return Err(RepairflowError::Validation(format!(
                "rule {} does not accept new actions",
                form.rule().key()
            )));
        }

        form.finalize()
    }
}
