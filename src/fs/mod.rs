//! File system utilities for repairflow
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{append_json_line, read_config, read_json, read_json_lines, write_json};
pub use paths::{
    find_shop_root, get_audit_dir, get_audit_path, get_config_path, get_data_dir,
    get_ticket_path, get_tickets_dir, resolve_cwd, DATA_DIR,
};
