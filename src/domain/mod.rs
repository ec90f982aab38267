//! Domain logic for areas, guards, transition forms and SLAs
//!
//! Everything in here is pure: no I/O, no clocks read implicitly.

mod areas;
pub mod form;
mod guard;
mod rules;
mod sla;
mod transitions;
mod validation;

// Property-based tests (compiled only in test builds)
#[cfg(test)]
mod property_tests;

pub use areas::{
    get_area_index, is_bypass_pair, is_gated_destination, is_service_to_service, ALL_AREAS,
    BYPASS_PAIR,
};
pub use form::{
    reorder, ActionBuilder, ActionDraft, FieldValue, FinalizationPayload, FormAnswers,
    FormStage, FormSummary, ProblemChoice, ProjectedTotals, RealDataAnalysis, ResolveSheet,
    StageOutcome, TransitionForm,
};
pub use guard::{decide, GuardDecision};
pub use rules::{RuleTable, PROBLEM_OPTIONS, WAITING_REASONS};
pub use sla::{format_duration, SlaPolicy, SlaReport, SlaStatus};
pub use transitions::{apply_move, patch_from_payload};
pub use validation::{
    validate_exit_resolution, validate_field_value, validate_hardware_change,
    validate_required_fields, validate_slot_config, ValidationResult,
};
