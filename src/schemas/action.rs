//! Service action schemas - planned and reconciled repair work

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ticket::Area;

/// Kind of repair work. Only `Hardware` carries a RAM/disk change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    #[default]
    Repair,
    Hardware,
    Software,
    Cleaning,
    Other,
}

impl ActionCategory {
    pub fn signals_hardware_change(self) -> bool {
        self == ActionCategory::Hardware
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionCategory::Repair => write!(f, "repair"),
            ActionCategory::Hardware => write!(f, "hardware"),
            ActionCategory::Software => write!(f, "software"),
            ActionCategory::Cleaning => write!(f, "cleaning"),
            ActionCategory::Other => write!(f, "other"),
        }
    }
}

/// Slot count plus one detail string per populated slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SlotConfig {
    pub slots: u8,
    pub details: Vec<String>,
}

impl SlotConfig {
    pub fn new(details: Vec<String>) -> Self {
        SlotConfig {
            slots: details.len() as u8,
            details,
        }
    }
}

/// Planned RAM/disk change attached to a hardware action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HardwareChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_config: Option<SlotConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_config: Option<SlotConfig>,
}

impl HardwareChange {
    pub fn is_empty(&self) -> bool {
        self.ram_config.is_none() && self.disk_config.is_none()
    }

    /// The configuration that results from applying this change to `original`
    pub fn apply_to(&self, original: &HardwareConfig) -> HardwareConfig {
        HardwareConfig {
            ram: self
                .ram_config
                .as_ref()
                .map_or_else(|| original.ram.clone(), |c| c.details.clone()),
            disk: self
                .disk_config
                .as_ref()
                .map_or_else(|| original.disk.clone(), |c| c.details.clone()),
        }
    }
}

/// Installed memory and storage modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HardwareConfig {
    #[serde(default)]
    pub ram: Vec<String>,
    #[serde(default)]
    pub disk: Vec<String>,
}

/// Where a transferred action came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOrigin {
    pub from_area: Area,
    pub original_observation: String,
}

/// A unit of planned repair work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAction {
    /// Problem description, from the option list or free text
    pub text: String,
    #[serde(default)]
    pub category: ActionCategory,
    pub observation: String,
    pub planned_cost: f64,
    /// Minutes
    pub planned_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_change: Option<HardwareChange>,
    /// Set when the action was carried over from another service area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferOrigin>,
}

impl ServiceAction {
    pub fn new(
        text: impl Into<String>,
        observation: impl Into<String>,
        planned_cost: f64,
        planned_time: u32,
    ) -> Self {
        ServiceAction {
            text: text.into(),
            category: ActionCategory::Repair,
            observation: observation.into(),
            planned_cost,
            planned_time,
            hardware_change: None,
            transfer: None,
        }
    }

    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_hardware_change(mut self, change: HardwareChange) -> Self {
        self.category = ActionCategory::Hardware;
        self.hardware_change = Some(change);
        self
    }

    /// Return a copy tagged as transferred out of `from_area`
    pub fn transferred_from(&self, from_area: Area) -> Self {
        let mut moved = self.clone();
        let original_observation = match &self.transfer {
            Some(origin) => origin.original_observation.clone(),
            None => self.observation.clone(),
        };
        moved.transfer = Some(TransferOrigin {
            from_area,
            original_observation,
        });
        moved
    }

    pub fn is_transfer(&self) -> bool {
        self.transfer.is_some()
    }
}

/// Operator's reconciliation of one open action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAction {
    /// Index into the ticket's `service_actions` at the time of the move
    pub index: usize,
    pub action: ServiceAction,
    pub resolved: bool,
    pub real_cost: f64,
    pub real_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_hardware: Option<HardwareConfig>,
}

/// A resolved action kept in the ticket's service history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedAction {
    pub action: ServiceAction,
    pub area: Area,
    pub real_cost: f64,
    pub real_time: u32,
    pub resolved_at: DateTime<Utc>,
}

/// One side of a component swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SwapRecord {
    pub swapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,
}

/// RAM and disk swap toggles captured on exit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HardwareSwaps {
    #[serde(default)]
    pub ram: SwapRecord,
    #[serde(default)]
    pub disk: SwapRecord,
}

impl HardwareSwaps {
    pub fn any_swapped(&self) -> bool {
        self.ram.swapped || self.disk.swapped
    }
}
