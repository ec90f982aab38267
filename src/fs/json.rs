//! JSON file operations with schema validation
//!
//! Whole-document reads and atomic writes, plus JSON-lines append for logs.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{RepairflowError, Result};
use crate::schemas::Config;

use super::paths::get_config_path;

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file does not parse into `T`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RepairflowError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            RepairflowError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        RepairflowError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| RepairflowError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Append one compact JSON document as a line.
pub fn append_json_line<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let mut line =
        serde_json::to_string(data).map_err(|e| RepairflowError::InvalidJson(e.to_string()))?;
    line.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Read every line of a JSON-lines file. A missing file is an empty log.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RepairflowError::Io(e)),
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| {
                RepairflowError::InvalidJson(format!(
                    "Invalid JSON in {} line {}: {}",
                    path.display(),
                    n + 1,
                    e
                ))
            })
        })
        .collect()
}

/// Read the config.json file, or defaults if it doesn't exist.
pub fn read_config(root: &Path) -> Result<Config> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}
