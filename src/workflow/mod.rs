//! Move orchestration on top of the domain rules and the ticket store

pub mod bulk;
pub mod executor;
pub mod pending;

pub use bulk::{move_many, BulkFailure, BulkReport};
pub use executor::{ensure_area_changes, ensure_payload_matches, AuditMeta, MoveExecutor, MoveOutcome};
pub use pending::{begin_move, MoveStep, PendingMove, PendingStep};
