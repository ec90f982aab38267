//! Validation rules for transition forms

use std::collections::BTreeMap;

use crate::errors::{RepairflowError, Result};
use crate::schemas::{
    ActionCategory, Area, FieldKind, FieldSpec, HardwareChange, SlotConfig, TransitionRule,
};

use super::form::FieldValue;

/// Result of a validation check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Reason for failure (if valid is false)
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
        }
    }

    /// Create a failed validation result
    pub fn failure(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Convert into a `Result`, mapping failure to a validation error
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(RepairflowError::Validation(
                self.reason
                    .unwrap_or_else(|| "validation failed".to_string()),
            ))
        }
    }
}

/// Check that a value fits the kind of field it is entered into
pub fn validate_field_value(spec: &FieldSpec, value: &FieldValue) -> ValidationResult {
    match (&spec.kind, value) {
        (FieldKind::Text | FieldKind::TextArea, FieldValue::Text(_)) => ValidationResult::success(),
        (FieldKind::Select { options }, FieldValue::Choice(choice) | FieldValue::Text(choice)) => {
            if options.iter().any(|o| o == choice) {
                ValidationResult::success()
            } else {
                ValidationResult::failure(format!(
                    "'{}' is not an option for {}",
                    choice, spec.label
                ))
            }
        }
        (FieldKind::Number, FieldValue::Number(n)) => {
            if n.is_finite() {
                ValidationResult::success()
            } else {
                ValidationResult::failure(format!("{} must be a finite number", spec.label))
            }
        }
        (FieldKind::BudgetStatusSelector, FieldValue::Budget(_)) => ValidationResult::success(),
        (FieldKind::ActionBuilder { .. } | FieldKind::ActionResolver | FieldKind::HardwareSwaps, _) => {
            ValidationResult::failure(format!("{} is not a plain field", spec.label))
        }
        _ => ValidationResult::failure(format!("wrong value type for {}", spec.label)),
    }
}

/// Check every required plain field has a non-blank value
pub fn validate_required_fields(
    rule: &TransitionRule,
    values: &BTreeMap<String, FieldValue>,
) -> ValidationResult {
    let missing: Vec<&str> = rule
        .fields
        .iter()
        .filter(|f| f.required && f.is_plain())
        .filter(|f| values.get(&f.id).map_or(true, |v| v.is_blank()))
        .map(|f| f.label.as_str())
        .collect();

    if missing.is_empty() {
        ValidationResult::success()
    } else {
        ValidationResult::failure(format!("missing required fields: {}", missing.join(", ")))
    }
}

/// Check a slot sub-form: at least one slot, one detail per slot
pub fn validate_slot_config(label: &str, config: &SlotConfig) -> ValidationResult {
    if config.slots == 0 {
        return ValidationResult::failure(format!("{} needs at least one slot", label));
    }
    if config.details.len() != config.slots as usize {
        return ValidationResult::failure(format!(
            "{} has {} slots but {} details",
            label,
            config.slots,
            config.details.len()
        ));
    }
    if config.details.iter().any(|d| d.trim().is_empty()) {
        return ValidationResult::failure(format!("{} has an empty slot detail", label));
    }
    ValidationResult::success()
}

/// The hardware sub-form is required for hardware actions and rejected otherwise
pub fn validate_hardware_change(
    category: ActionCategory,
    change: Option<&HardwareChange>,
) -> ValidationResult {
    match (category.signals_hardware_change(), change) {
        (false, None) => ValidationResult::success(),
        (false, Some(_)) => {
            ValidationResult::failure(format!("{} actions cannot carry a hardware change", category))
        }
        (true, None) => ValidationResult::failure("hardware actions need a RAM or disk change"),
        (true, Some(change)) if change.is_empty() => {
            ValidationResult::failure("hardware actions need a RAM or disk change")
        }
        (true, Some(change)) => {
            if let Some(ram) = &change.ram_config {
                let result = validate_slot_config("RAM", ram);
                if !result.valid {
                    return result;
                }
            }
            if let Some(disk) = &change.disk_config {
                let result = validate_slot_config("Disk", disk);
                if !result.valid {
                    return result;
                }
            }
            ValidationResult::success()
        }
    }
}

/// Exits to advertising or dispatch leave no open work behind
pub fn validate_exit_resolution(to: Area, unresolved: usize) -> ValidationResult {
    if to.is_exit() && unresolved > 0 {
        return ValidationResult::failure(format!(
            "{} action(s) still unresolved; all actions must be resolved before moving to {}",
            unresolved, to
        ));
    }
    ValidationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::BudgetStatus;

    fn select() -> FieldSpec {
        FieldSpec::new(
            "reason",
            "Reason",
            FieldKind::Select {
                options: vec!["Awaiting parts".to_string()],
            },
        )
    }

    #[test]
    fn test_validate_field_value() {
        assert!(validate_field_value(&select(), &FieldValue::Choice("Awaiting parts".into())).valid);
        assert!(!validate_field_value(&select(), &FieldValue::Choice("Lunch".into())).valid);

        let number = FieldSpec::new("n", "Cost", FieldKind::Number);
        assert!(validate_field_value(&number, &FieldValue::Number(3.0)).valid);
        assert!(!validate_field_value(&number, &FieldValue::Number(f64::NAN)).valid);
        assert!(!validate_field_value(&number, &FieldValue::text("3")).valid);

        let budget = FieldSpec::new("b", "Budget", FieldKind::BudgetStatusSelector);
        assert!(validate_field_value(&budget, &FieldValue::Budget(BudgetStatus::Arrived)).valid);

        let swaps = FieldSpec::new("s", "Swaps", FieldKind::HardwareSwaps);
        assert!(!validate_field_value(&swaps, &FieldValue::text("x")).valid);
    }

    #[test]
    fn test_validate_required_fields() {
        let rule = TransitionRule::new(
            Area::Intake,
            Area::RecycleBox,
            "Write off",
            vec![
                FieldSpec::new("reason", "Reason", FieldKind::TextArea).required(),
                FieldSpec::new("notes", "Notes", FieldKind::Text),
            ],
        );
        let mut values = BTreeMap::new();
        let result = validate_required_fields(&rule, &values);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("Reason"));

        values.insert("reason".to_string(), FieldValue::text("  "));
        assert!(!validate_required_fields(&rule, &values).valid);

        values.insert("reason".to_string(), FieldValue::text("water damage"));
        assert!(validate_required_fields(&rule, &values).valid);
    }

    #[test]
    fn test_validate_slot_config() {
        assert!(validate_slot_config("RAM", &SlotConfig::new(vec!["8GB".into()])).valid);
        assert!(!validate_slot_config("RAM", &SlotConfig::new(vec![])).valid);
        let mismatch = SlotConfig {
            slots: 2,
            details: vec!["8GB".into()],
        };
        assert!(!validate_slot_config("RAM", &mismatch).valid);
    }

    #[test]
    fn test_validate_hardware_change() {
        let change = HardwareChange {
            ram_config: Some(SlotConfig::new(vec!["16GB".into()])),
            disk_config: None,
        };
        assert!(validate_hardware_change(ActionCategory::Hardware, Some(&change)).valid);
        assert!(!validate_hardware_change(ActionCategory::Hardware, None).valid);
        assert!(
            !validate_hardware_change(ActionCategory::Hardware, Some(&HardwareChange::default()))
                .valid
        );
        assert!(!validate_hardware_change(ActionCategory::Repair, Some(&change)).valid);
        assert!(validate_hardware_change(ActionCategory::Repair, None).valid);
    }

    #[test]
    fn test_validate_exit_resolution() {
        assert!(!validate_exit_resolution(Area::DispatchBox, 1).valid);
        assert!(validate_exit_resolution(Area::DispatchBox, 0).valid);
        assert!(validate_exit_resolution(Area::WaitingBox, 3).valid);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationResult::success().into_result().is_ok());
        let err = ValidationResult::failure("nope").into_result().unwrap_err();
        assert!(matches!(err, RepairflowError::Validation(ref m) if m == "nope"));
    }
}
