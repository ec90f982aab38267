//! Schema types for repairflow
//!
//! Everything here is plain serde data; behavior lives in `domain` and `workflow`.

mod action;
mod audit;
mod config;
mod patch;
mod rule;
mod ticket;

pub use action::{
    ActionCategory, CompletedAction, HardwareChange, HardwareConfig, HardwareSwaps,
    ResolvedAction, ServiceAction, SlotConfig, SwapRecord, TransferOrigin,
};
pub use audit::{AuditEntry, MoveKind};
pub use config::{Config, SlaConfig};
pub use patch::TicketPatch;
pub use rule::{FieldKind, FieldSpec, TransitionRule};
pub use ticket::{Area, Budget, BudgetStatus, Ticket, REQUIRED_INFO_FIELDS};
