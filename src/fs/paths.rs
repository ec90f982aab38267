//! Path resolution utilities for repairflow
//!
//! Provides functions to locate the shop root and construct paths to the
//! ticket documents and audit logs under `.repairflow`.

use std::path::{Path, PathBuf};

use crate::errors::{RepairflowError, Result};

/// Name of the data directory at the shop root
pub const DATA_DIR: &str = ".repairflow";

/// Find the shop root containing a .repairflow directory.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `FileNotFound` - If no ancestor contains a .repairflow directory
pub fn find_shop_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd.canonicalize().map_err(|e| {
        RepairflowError::FileNotFound(format!("Cannot resolve path {}: {}", start_cwd.display(), e))
    })?;

    loop {
        if current.join(DATA_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(RepairflowError::FileNotFound(format!(
                    "Could not find a {} directory; run `repairflow init` first",
                    DATA_DIR
                )));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub fn get_data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

pub fn get_config_path(root: &Path) -> PathBuf {
    get_data_dir(root).join("config.json")
}

pub fn get_tickets_dir(root: &Path) -> PathBuf {
    get_data_dir(root).join("tickets")
}

/// One JSON document per ticket
pub fn get_ticket_path(root: &Path, id: &str) -> PathBuf {
    get_tickets_dir(root).join(format!("{}.json", id))
}

pub fn get_audit_dir(root: &Path) -> PathBuf {
    get_data_dir(root).join("audit")
}

/// Append-only JSON-lines log per ticket
pub fn get_audit_path(root: &Path, id: &str) -> PathBuf {
    get_audit_dir(root).join(format!("{}.jsonl", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_shop() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(DATA_DIR)).unwrap();
        temp
    }

    #[test]
    fn test_find_shop_root_at_root() {
        let temp = setup_shop();
        let root = find_shop_root(temp.path()).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_shop_root_from_subdir() {
        let temp = setup_shop();
        let subdir = temp.path().join("bench").join("drawer");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = find_shop_root(&subdir).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_shop_root_not_found() {
        let temp = TempDir::new().unwrap();
        let result = find_shop_root(temp.path());
        assert!(matches!(result, Err(RepairflowError::FileNotFound(_))));
    }

    #[test]
    fn test_paths() {
        let root = PathBuf::from("/shop");
        assert_eq!(get_config_path(&root), PathBuf::from("/shop/.repairflow/config.json"));
        assert_eq!(
            get_ticket_path(&root, "t-1"),
            PathBuf::from("/shop/.repairflow/tickets/t-1.json")
        );
        assert_eq!(
            get_audit_path(&root, "t-1"),
            PathBuf::from("/shop/.repairflow/audit/t-1.jsonl")
        );
    }

    #[test]
    fn test_resolve_cwd_with_override() {
        let path = PathBuf::from("/custom/path");
        assert_eq!(resolve_cwd(Some(&path)), path);
    }
}
