//! Ticket schema - The device being tracked through the service areas

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::{CompletedAction, HardwareConfig, HardwareSwaps, ServiceAction};

/// Workflow area a ticket can sit in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    /// Device received, not yet triaged
    Intake,
    /// Short repair bench
    QuickService,
    /// Long repair bench
    DedicatedService,
    /// Listed for sale
    AdvertisingBox,
    /// Ready to leave the shop
    DispatchBox,
    /// Parked, usually waiting on parts
    WaitingBox,
    /// Written off
    RecycleBox,
}

impl Area {
    /// Service benches where repair actions are planned and resolved
    pub fn is_service(self) -> bool {
        matches!(self, Area::QuickService | Area::DedicatedService)
    }

    /// Terminal exit areas guarded by the info and QA gates
    pub fn is_exit(self) -> bool {
        matches!(self, Area::AdvertisingBox | Area::DispatchBox)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Area::Intake => "Intake",
            Area::QuickService => "QuickService",
            Area::DedicatedService => "DedicatedService",
            Area::AdvertisingBox => "AdvertisingBox",
            Area::DispatchBox => "DispatchBox",
            Area::WaitingBox => "WaitingBox",
            Area::RecycleBox => "RecycleBox",
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-insensitive so the CLI accepts `dispatchbox` as well
        match s.to_ascii_lowercase().as_str() {
            "intake" => Ok(Area::Intake),
            "quickservice" => Ok(Area::QuickService),
            "dedicatedservice" => Ok(Area::DedicatedService),
            "advertisingbox" => Ok(Area::AdvertisingBox),
            "dispatchbox" => Ok(Area::DispatchBox),
            "waitingbox" => Ok(Area::WaitingBox),
            "recyclebox" => Ok(Area::RecycleBox),
            _ => Err(format!("Unknown area: {}", s)),
        }
    }
}

/// Purchasing status of the parts budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    Pending,
    Bought,
    Shipping,
    Arrived,
    OutOfStock,
}

impl BudgetStatus {
    pub const ALL: [BudgetStatus; 5] = [
        BudgetStatus::Pending,
        BudgetStatus::Bought,
        BudgetStatus::Shipping,
        BudgetStatus::Arrived,
        BudgetStatus::OutOfStock,
    ];
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::Pending => write!(f, "pending"),
            BudgetStatus::Bought => write!(f, "bought"),
            BudgetStatus::Shipping => write!(f, "shipping"),
            BudgetStatus::Arrived => write!(f, "arrived"),
            BudgetStatus::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

/// Parts budget attached to a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Budget {
    pub status: BudgetStatus,
    pub cost: f64,
}

/// Technical fields that must be filled before a ticket may exit to
/// advertising or dispatch.
pub const REQUIRED_INFO_FIELDS: &[&str] = &["cpu", "ram", "disk", "screen", "battery", "os"];

/// A device moving through the workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    /// Unique identifier
    pub id: String,

    /// Short code printed on the device label
    pub human_code: String,

    /// Device model, used in customer messages
    #[serde(default)]
    pub model_name: String,

    /// Customer contact for pickup notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// Area the ticket currently sits in
    pub current_area: Area,

    pub created_at: DateTime<Utc>,

    /// When the ticket entered `current_area` (None until the first move)
    #[serde(default)]
    pub moved_to_area_at: Option<DateTime<Utc>>,

    /// Technical spec fields, see [`REQUIRED_INFO_FIELDS`]
    #[serde(default)]
    pub additional_info: BTreeMap<String, String>,

    /// QA checklist item -> passed
    #[serde(default)]
    pub qa_checklist: BTreeMap<String, bool>,

    /// Open repair work, accumulated across service visits until resolved
    #[serde(default)]
    pub service_actions: Vec<ServiceAction>,

    /// Reconciled repair work
    #[serde(default)]
    pub service_history: Vec<CompletedAction>,

    #[serde(default)]
    pub budget: Budget,

    /// Installed RAM and disk modules
    #[serde(default)]
    pub hardware: HardwareConfig,

    /// Last recorded component swap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_swaps: Option<HardwareSwaps>,
}

impl Ticket {
    /// Create a new ticket at intake
    pub fn new(id: impl Into<String>, human_code: impl Into<String>) -> Self {
        Ticket {
            schema_version: 1,
            id: id.into(),
            human_code: human_code.into(),
            model_name: String::new(),
            contact: None,
            current_area: Area::Intake,
            created_at: Utc::now(),
            moved_to_area_at: None,
            additional_info: BTreeMap::new(),
            qa_checklist: BTreeMap::new(),
            service_actions: Vec::new(),
            service_history: Vec::new(),
            budget: Budget::default(),
            hardware: HardwareConfig::default(),
            hardware_swaps: None,
        }
    }

    // ===== BUILDER METHODS =====

    pub fn with_area(mut self, area: Area) -> Self {
        self.current_area = area;
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// Fill every required info field with a placeholder value
    pub fn with_complete_info(mut self) -> Self {
        for field in REQUIRED_INFO_FIELDS {
            self.additional_info
                .entry(field.to_string())
                .or_insert_with(|| "n/a".to_string());
        }
        self
    }

    pub fn with_qa_item(mut self, key: impl Into<String>, checked: bool) -> Self {
        self.qa_checklist.insert(key.into(), checked);
        self
    }

    pub fn with_actions(mut self, actions: Vec<ServiceAction>) -> Self {
        self.service_actions = actions;
        self
    }

    pub fn with_hardware(mut self, hardware: HardwareConfig) -> Self {
        self.hardware = hardware;
        self
    }

    // ===== DERIVED STATE =====

    /// Required info fields that are absent or blank
    pub fn missing_info_fields(&self) -> Vec<&'static str> {
        REQUIRED_INFO_FIELDS
            .iter()
            .copied()
            .filter(|field| {
                self.additional_info
                    .get(*field)
                    .map_or(true, |v| v.trim().is_empty())
            })
            .collect()
    }

    pub fn additional_info_complete(&self) -> bool {
        self.missing_info_fields().is_empty()
    }

    /// Percentage of QA items checked, rounded. An empty checklist is 0.
    pub fn qa_progress(&self) -> u8 {
        let total = self.qa_checklist.len();
        if total == 0 {
            return 0;
        }
        let checked = self.qa_checklist.values().filter(|v| **v).count();
        (100.0 * checked as f64 / total as f64).round() as u8
    }

    /// Start of the current area's SLA clock
    pub fn area_entered_at(&self) -> DateTime<Utc> {
        match self.moved_to_area_at {
            Some(moved) if moved > self.created_at => moved,
            _ => self.created_at,
        }
    }
}
