//! Plain field values

use serde::{Deserialize, Serialize};

use crate::errors::{RepairflowError, Result};
use crate::schemas::{BudgetStatus, FieldKind, FieldSpec};

/// Value entered for a plain (non sub-form) field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Choice(String),
    Number(f64),
    Budget(BudgetStatus),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Budget(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_budget(&self) -> Option<BudgetStatus> {
        match self {
            FieldValue::Budget(status) => Some(*status),
            _ => None,
        }
    }

    /// Interpret a raw JSON answer according to the field's kind
    pub fn from_json(spec: &FieldSpec, raw: &serde_json::Value) -> Result<Self> {
        let mismatch = || {
            RepairflowError::Validation(format!(
                "field '{}' cannot take value {}",
                spec.id, raw
            ))
        };
        match &spec.kind {
            FieldKind::Text | FieldKind::TextArea => {
                raw.as_str().map(FieldValue::text).ok_or_else(mismatch)
            }
            FieldKind::Select { .. } => raw
                .as_str()
                .map(|s| FieldValue::Choice(s.to_string()))
                .ok_or_else(mismatch),
            FieldKind::Number => raw.as_f64().map(FieldValue::Number).ok_or_else(mismatch),
            FieldKind::BudgetStatusSelector => serde_json::from_value(raw.clone())
                .map(FieldValue::Budget)
                .map_err(|_| mismatch()),
            FieldKind::ActionBuilder { .. } | FieldKind::ActionResolver | FieldKind::HardwareSwaps => {
                Err(RepairflowError::Validation(format!(
                    "field '{}' is a sub-form, not a plain value",
                    spec.id
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_by_kind() {
        let number = FieldSpec::new("cost", "Cost", FieldKind::Number);
        assert_eq!(
            FieldValue::from_json(&number, &json!(12.5)).unwrap(),
            FieldValue::Number(12.5)
        );
        assert!(FieldValue::from_json(&number, &json!("12")).is_err());

        let budget = FieldSpec::new("b", "Budget", FieldKind::BudgetStatusSelector);
        assert_eq!(
            FieldValue::from_json(&budget, &json!("out_of_stock")).unwrap(),
            FieldValue::Budget(BudgetStatus::OutOfStock)
        );
        assert!(FieldValue::from_json(&budget, &json!("lost")).is_err());

        let resolver = FieldSpec::new("r", "Resolve", FieldKind::ActionResolver);
        assert!(FieldValue::from_json(&resolver, &json!("x")).is_err());
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::text("   ").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::Budget(BudgetStatus::Pending).is_blank());
    }

    #[test]
    fn test_field_value_serialization() {
        let json = serde_json::to_string(&FieldValue::Budget(BudgetStatus::Bought)).unwrap();
        assert_eq!(json, r#"{"type":"budget","value":"bought"}"#);
    }
}
