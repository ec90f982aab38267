//! Transition rule schema - the paperwork attached to an area-to-area move

use serde::{Deserialize, Serialize};

use super::ticket::Area;

/// Kind of input a form field collects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Select { options: Vec<String> },
    Number,
    /// Collects new planned actions when entering a service area
    ActionBuilder { options: Vec<String> },
    /// Reconciles open actions when leaving a service area
    ActionResolver,
    BudgetStatusSelector,
    HardwareSwaps,
}

/// One field of a transition form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            id: id.into(),
            label: label.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Fields holding a plain value, as opposed to the action/swap sub-forms
    pub fn is_plain(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text
                | FieldKind::TextArea
                | FieldKind::Select { .. }
                | FieldKind::Number
                | FieldKind::BudgetStatusSelector
        )
    }
}

/// Form schema for an ordered pair of areas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: Area,
    pub to: Area,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl TransitionRule {
    pub fn new(from: Area, to: Area, title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        TransitionRule {
            from,
            to,
            title: title.into(),
            fields,
        }
    }

    /// Lookup key, e.g. `QuickService->DispatchBox`
    pub fn key(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn has_resolver(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::ActionResolver))
    }

    /// The action builder field, if the rule declares one
    pub fn builder_field(&self) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| matches!(f.kind, FieldKind::ActionBuilder { .. }))
    }

    pub fn has_hardware_swaps(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::HardwareSwaps))
    }
}
