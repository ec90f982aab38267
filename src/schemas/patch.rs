//! Partial ticket update, as written by the move executor and the info/QA sub-flows

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::{CompletedAction, HardwareConfig, HardwareSwaps, ServiceAction};
use super::ticket::{BudgetStatus, Ticket};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TicketPatch {
    /// Replaces the open action list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_actions: Option<Vec<ServiceAction>>,

    /// Appended to the service history
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append_history: Vec<CompletedAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_status: Option<BudgetStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_swaps: Option<HardwareSwaps>,

    /// Merged into `additional_info`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_info: BTreeMap<String, String>,

    /// Merged into `qa_checklist`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub qa_checklist: BTreeMap<String, bool>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self == &TicketPatch::default()
    }

    pub fn info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    pub fn qa(mut self, key: impl Into<String>, checked: bool) -> Self {
        self.qa_checklist.insert(key.into(), checked);
        self
    }

    pub fn apply(&self, ticket: &mut Ticket) {
        if let Some(actions) = &self.service_actions {
            ticket.service_actions = actions.clone();
        }
        ticket
            .service_history
            .extend(self.append_history.iter().cloned());
        if let Some(status) = self.budget_status {
            ticket.budget.status = status;
        }
        if let Some(cost) = self.budget_cost {
            ticket.budget.cost = cost;
        }
        if let Some(hardware) = &self.hardware {
            ticket.hardware = hardware.clone();
        }
        if let Some(swaps) = &self.hardware_swaps {
            ticket.hardware_swaps = Some(swaps.clone());
        }
        for (key, value) in &self.additional_info {
            ticket.additional_info.insert(key.clone(), value.clone());
        }
        for (key, checked) in &self.qa_checklist {
            ticket.qa_checklist.insert(key.clone(), *checked);
        }
    }
}
