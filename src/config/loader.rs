//! Configuration loading with defaults

use std::path::Path;

use crate::domain::SlaPolicy;
use crate::errors::Result;
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the shop root, falling back to defaults.
///
/// Fields missing from config.json take their default values. The SLA
/// section is validated here so a bad offset fails at startup.
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    config.sla_policy()?;
    Ok(config)
}

impl Config {
    /// SLA policy described by the `sla` section
    pub fn sla_policy(&self) -> Result<SlaPolicy> {
        SlaPolicy::from_config(&self.sla)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Area;
    use chrono::{Duration, Weekday};
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir(temp.path().join(".repairflow")).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.pickup_area, Area::DispatchBox);
        assert_eq!(config.default_actor, "system");
        assert_eq!(config.sla.rest_day, Weekday::Sun);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join(".repairflow");
        std_fs::create_dir(&data_dir).unwrap();

        let config_content = r#"{
            "pickup_area": "AdvertisingBox",
            "sla": { "rest_day": "Sat", "limits_hours": { "QuickService": 24 } }
        }"#;
        std_fs::write(data_dir.join("config.json"), config_content).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.pickup_area, Area::AdvertisingBox);
        assert_eq!(config.sla.rest_day, Weekday::Sat);
        // Default for unspecified field
        assert_eq!(config.default_actor, "system");

        let policy = config.sla_policy().unwrap();
        assert_eq!(policy.limit_for(Area::QuickService), Some(Duration::hours(24)));
        assert_eq!(policy.limit_for(Area::Intake), None);
    }

    #[test]
    fn test_load_config_rejects_bad_offset() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join(".repairflow");
        std_fs::create_dir(&data_dir).unwrap();
        std_fs::write(
            data_dir.join("config.json"),
            r#"{ "sla": { "utc_offset_minutes": 100000 } }"#,
        )
        .unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
