//! Error types for repairflow
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

use crate::schemas::Area;

/// Result type alias for repairflow operations
pub type Result<T> = std::result::Result<T, RepairflowError>;

/// Main error type for all repairflow operations
#[derive(Debug, Error)]
pub enum RepairflowError {
    /// A form submission failed validation; nothing was persisted
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A form value was set for a field the rule does not declare
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A form operation was attempted in the wrong stage
    #[error("Form stage error: {0}")]
    FormStage(String),

    /// Ticket repository write or read failed
    #[error("Store error: {0}")]
    Store(String),

    /// No ticket with the given id
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// A move was requested to the area the ticket is already in
    #[error("Ticket {id} is already in {area}")]
    SameArea { id: String, area: Area },

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl RepairflowError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            RepairflowError::Validation(_) => "VALIDATION",
            RepairflowError::UnknownField(_) => "UNKNOWN_FIELD",
            RepairflowError::FormStage(_) => "FORM_STAGE",
            RepairflowError::Store(_) => "STORE_ERROR",
            RepairflowError::TicketNotFound(_) => "TICKET_NOT_FOUND",
            RepairflowError::SameArea { .. } => "SAME_AREA",
            RepairflowError::InvalidJson(_) => "INVALID_JSON",
            RepairflowError::FileNotFound(_) => "FILE_NOT_FOUND",
            RepairflowError::ConfigError(_) => "CONFIG_ERROR",
            RepairflowError::Notification(_) => "NOTIFICATION_ERROR",
            RepairflowError::Io(_) => "IO_ERROR",
            RepairflowError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// True for errors raised before anything was written
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RepairflowError::Validation(_)
                | RepairflowError::UnknownField(_)
                | RepairflowError::FormStage(_)
                | RepairflowError::SameArea { .. }
        )
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        RepairflowError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &RepairflowError) -> i32 {
    if error.is_validation() {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RepairflowError::Validation("x".into()).code(), "VALIDATION");
        assert_eq!(RepairflowError::UnknownField("x".into()).code(), "UNKNOWN_FIELD");
        assert_eq!(RepairflowError::FormStage("x".into()).code(), "FORM_STAGE");
        assert_eq!(RepairflowError::Store("x".into()).code(), "STORE_ERROR");
        assert_eq!(RepairflowError::TicketNotFound("x".into()).code(), "TICKET_NOT_FOUND");
        assert_eq!(RepairflowError::InvalidJson("x".into()).code(), "INVALID_JSON");
        assert_eq!(RepairflowError::FileNotFound("x".into()).code(), "FILE_NOT_FOUND");
        assert_eq!(RepairflowError::ConfigError("x".into()).code(), "CONFIG_ERROR");
        assert_eq!(RepairflowError::Notification("x".into()).code(), "NOTIFICATION_ERROR");
        assert_eq!(
            RepairflowError::SameArea {
                id: "t1".into(),
                area: Area::Intake
            }
            .code(),
            "SAME_AREA"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(to_exit_code(&RepairflowError::Validation("x".into())), 2);
        assert_eq!(to_exit_code(&RepairflowError::Store("x".into())), 1);
        assert_eq!(to_exit_code(&RepairflowError::TicketNotFound("x".into())), 1);
    }

    #[test]
    fn test_wrap_error() {
        let wrapped = RepairflowError::wrap("inner error", "outer context");
        assert_eq!(wrapped.code(), "WRAPPED_ERROR");
        assert!(wrapped.to_string().contains("outer context"));
        assert!(wrapped.to_string().contains("inner error"));
    }

    #[test]
    fn test_same_area_message() {
        let err = RepairflowError::SameArea {
            id: "t1".into(),
            area: Area::WaitingBox,
        };
        assert_eq!(err.to_string(), "Ticket t1 is already in WaitingBox");
    }
}
