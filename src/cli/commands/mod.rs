//! CLI command implementations

pub mod audit;
pub mod bulk_move;
pub mod check;
pub mod create;
pub mod init;
pub mod list;
pub mod move_ticket;
pub mod rules;
pub mod show;
pub mod sla;
pub mod update;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::load_config;
use crate::domain::SlaPolicy;
use crate::errors::{RepairflowError, Result};
use crate::fs::{find_shop_root, resolve_cwd};
use crate::notify::LogNotifier;
use crate::schemas::Config;
use crate::store::JsonStore;
use crate::workflow::MoveExecutor;

/// An opened shop directory: config plus the file-backed store
pub struct Shop {
    pub root: PathBuf,
    pub config: Config,
    pub store: Arc<JsonStore>,
}

impl Shop {
    pub fn open(cwd: Option<&Path>) -> Result<Self> {
        let root = find_shop_root(&resolve_cwd(cwd))?;
        let config = load_config(&root)?;
        Ok(Shop {
            store: Arc::new(JsonStore::new(&root)),
            root,
            config,
        })
    }

    pub fn executor(&self) -> MoveExecutor {
        MoveExecutor::new(
            self.store.clone(),
            Arc::new(LogNotifier),
            self.config.pickup_area,
        )
    }

    pub fn sla_policy(&self) -> Result<SlaPolicy> {
        self.config.sla_policy()
    }

    pub fn actor(&self, actor: Option<&str>) -> String {
        actor
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_actor.clone())
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| RepairflowError::InvalidJson(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
