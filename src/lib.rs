//! Repairflow - Ticket lifecycle for a refurbished-laptop repair shop
//!
//! This library provides the core functionality for the repairflow CLI, including:
//! - Schema definitions for tickets, service actions, rules and audit entries
//! - Domain logic: guard evaluation, transition forms, SLA calculation
//! - A ticket repository trait with in-memory and JSON-file stores
//! - The move executor, pending-move tokens and bulk moves
//! - Customer pickup notifications

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod notify;
pub mod schemas;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use errors::{RepairflowError, Result};
pub use schemas::{Area, AuditEntry, Config, ServiceAction, Ticket, TicketPatch};
