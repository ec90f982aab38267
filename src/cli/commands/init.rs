//! Init command - Create the .repairflow directory

use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::Result;
use crate::fs::{get_audit_dir, get_config_path, get_tickets_dir, resolve_cwd, write_json};
use crate::schemas::Config;

/// Initialize a shop in the given directory
pub async fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    fs::create_dir_all(get_tickets_dir(&root))?;
    fs::create_dir_all(get_audit_dir(&root))?;

    let config_path = get_config_path(&root);
    if config_path.exists() && !force {
        info!("{} already exists, leaving it untouched", config_path.display());
    } else {
        write_json(&config_path, &Config::default())?;
        info!("wrote {}", config_path.display());
    }

    println!("Initialized repairflow in {}", root.display());
    Ok(())
}
