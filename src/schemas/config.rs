//! Config schema - Configuration for repairflow

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::ticket::Area;

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Time budget per area in business hours. Areas without an entry have no SLA.
    #[serde(default = "default_limits_hours")]
    pub limits_hours: BTreeMap<Area, u32>,

    /// Weekly day that does not count toward elapsed time
    #[serde(default = "default_rest_day")]
    pub rest_day: Weekday,

    /// Offset of the shop's local time from UTC, used for day boundaries
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Usage percentage above which a ticket is flagged as warning
    #[serde(default = "default_warning_percent")]
    pub warning_percent: f64,
}

fn default_limits_hours() -> BTreeMap<Area, u32> {
    BTreeMap::from([
        (Area::Intake, 24),
        (Area::QuickService, 48),
        (Area::DedicatedService, 72),
        (Area::WaitingBox, 168),
        (Area::DispatchBox, 48),
    ])
}

fn default_rest_day() -> Weekday {
    Weekday::Sun
}

fn default_warning_percent() -> f64 {
    80.0
}

impl Default for SlaConfig {
    fn default() -> Self {
        SlaConfig {
            limits_hours: default_limits_hours(),
            rest_day: default_rest_day(),
            utc_offset_minutes: 0,
            warning_percent: default_warning_percent(),
        }
    }
}

/// Main configuration for repairflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Area that triggers the customer pickup notice
    #[serde(default = "default_pickup_area")]
    pub pickup_area: Area,

    /// Actor recorded in the audit log when none is given
    #[serde(default = "default_actor")]
    pub default_actor: String,

    #[serde(default)]
    pub sla: SlaConfig,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pickup_area() -> Area {
    Area::DispatchBox
}

fn default_actor() -> String {
    "system".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            pickup_area: default_pickup_area(),
            default_actor: default_actor(),
            sla: SlaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.pickup_area, Area::DispatchBox);
        assert_eq!(config.default_actor, "system");
        assert_eq!(config.sla.rest_day, Weekday::Sun);
        assert_eq!(config.sla.warning_percent, 80.0);
        assert_eq!(config.sla.limits_hours.get(&Area::DedicatedService), Some(&72));
        assert!(config.sla.limits_hours.get(&Area::AdvertisingBox).is_none());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"pickup_area": "AdvertisingBox", "sla": {"utc_offset_minutes": 60}}"#;
        let parsed: Config = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.pickup_area, Area::AdvertisingBox);
        assert_eq!(parsed.sla.utc_offset_minutes, 60);
        // Other fields should have defaults
        assert_eq!(parsed.sla.rest_day, Weekday::Sun);
        assert_eq!(parsed.sla.limits_hours.len(), 5);
        assert_eq!(parsed.default_actor, "system");
    }

    #[test]
    fn test_limits_keyed_by_area_name() {
        let json = r#"{"sla": {"limits_hours": {"QuickService": 12}, "rest_day": "Sat"}}"#;
        let parsed: Config = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sla.limits_hours.len(), 1);
        assert_eq!(parsed.sla.limits_hours.get(&Area::QuickService), Some(&12));
        assert_eq!(parsed.sla.rest_day, Weekday::Sat);
    }
}
