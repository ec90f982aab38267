//! CLI module for repairflow
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schemas::Area;

/// Repairflow - Track refurbished laptops through the repair shop
#[derive(Parser, Debug)]
#[command(name = "repairflow")]
#[command(version)]
#[command(about = "Track refurbished laptops through intake, service and dispatch")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the .repairflow directory with a default config
    Init {
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },

    /// Register a new ticket at intake
    Create {
        /// Code printed on the device label
        code: String,

        /// Device model
        #[arg(long)]
        model: Option<String>,

        /// Customer contact for the pickup notice
        #[arg(long)]
        contact: Option<String>,

        /// Ticket id (generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List tickets with their SLA status
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only tickets in this area
        #[arg(long)]
        area: Option<Area>,
    },

    /// Show details of a ticket
    Show {
        /// Ticket id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report SLA status for every ticket with a time budget
    Sla {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what a move would require, without writing anything
    Check {
        /// Ticket id
        id: String,

        /// Destination area
        area: Area,
    },

    /// Move a ticket to another area
    Move {
        /// Ticket id
        id: String,

        /// Destination area
        area: Area,

        /// JSON file with the form answers
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Actor recorded in the audit log
        #[arg(long)]
        actor: Option<String>,

        /// Technical info to save if the move is waiting on it (key=value)
        #[arg(long = "info", value_parser = parse_key_value)]
        info: Vec<(String, String)>,

        /// QA items to save if the move is waiting on them (item=true|false)
        #[arg(long = "qa", value_parser = parse_qa_item)]
        qa: Vec<(String, bool)>,
    },

    /// Save technical info or QA results on a ticket
    Update {
        /// Ticket id
        id: String,

        /// Technical info (key=value)
        #[arg(long = "info", value_parser = parse_key_value)]
        info: Vec<(String, String)>,

        /// QA item result (item=true|false)
        #[arg(long = "qa", value_parser = parse_qa_item)]
        qa: Vec<(String, bool)>,
    },

    /// Move several tickets that need no form
    BulkMove {
        /// Destination area
        area: Area,

        /// Ticket ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// Actor recorded in the audit log
        #[arg(long)]
        actor: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the audit log of a ticket
    Audit {
        /// Ticket id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the configured transition rules
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_qa_item(raw: &str) -> Result<(String, bool), String> {
    let (key, value) = parse_key_value(raw)?;
    let checked = match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "pass" => true,
        "false" | "no" | "0" | "fail" => false,
        other => return Err(format!("expected true or false for '{}', got '{}'", key, other)),
    };
    Ok((key, checked))
}
