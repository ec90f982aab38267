//! Resolve mode: reconcile open actions when leaving a service area

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{RepairflowError, Result};
use crate::schemas::{Area, HardwareConfig, ResolvedAction, ServiceAction, Ticket};

/// Operator input for one open action
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveEntry {
    pub index: usize,
    pub action: ServiceAction,
    pub resolved: bool,
    pub real_cost: f64,
    pub real_time: u32,
    /// Pre-filled with the planned configuration for hardware actions
    pub final_hardware: Option<HardwareConfig>,
}

/// Original vs planned vs final hardware for one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareComparison {
    pub original: HardwareConfig,
    pub planned: HardwareConfig,
    pub final_state: HardwareConfig,
}

impl HardwareComparison {
    pub fn matches_plan(&self) -> bool {
        self.final_state == self.planned
    }

    pub fn changed(&self) -> bool {
        self.final_state != self.original
    }
}

/// Budgeted vs real totals over resolved actions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RealDataAnalysis {
    pub budget_cost: f64,
    pub real_cost: f64,
    pub diff_cost: f64,
    /// Minutes
    pub budget_time: i64,
    pub real_time: i64,
    pub diff_time: i64,
}

impl RealDataAnalysis {
    /// Sum resolved line items in iteration order
    pub fn from_resolved<'a>(items: impl IntoIterator<Item = &'a ResolvedAction>) -> Self {
        let mut analysis = RealDataAnalysis::default();
        for item in items.into_iter().filter(|i| i.resolved) {
            analysis.budget_cost += item.action.planned_cost;
            analysis.real_cost += item.real_cost;
            analysis.budget_time += i64::from(item.action.planned_time);
            analysis.real_time += i64::from(item.real_time);
        }
        analysis.diff_cost = analysis.real_cost - analysis.budget_cost;
        analysis.diff_time = analysis.real_time - analysis.budget_time;
        analysis
    }
}

/// Output of a finished resolve sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    pub resolved_actions: BTreeMap<usize, ResolvedAction>,
    pub resolved_hardware: BTreeMap<usize, HardwareConfig>,
    pub analysis: RealDataAnalysis,
    pub unresolved: Vec<ServiceAction>,
}

/// Working state of the resolve sub-form
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveSheet {
    from: Area,
    original_hardware: HardwareConfig,
    entries: Vec<ResolveEntry>,
}

impl ResolveSheet {
    /// One entry per open action, pre-filled with planned values
    pub fn new(ticket: &Ticket) -> Self {
        let entries = ticket
            .service_actions
            .iter()
            .enumerate()
            .map(|(index, action)| ResolveEntry {
                index,
                action: action.clone(),
                resolved: false,
                real_cost: action.planned_cost,
                real_time: action.planned_time,
                final_hardware: action
                    .hardware_change
                    .as_ref()
                    .map(|change| change.apply_to(&ticket.hardware)),
            })
            .collect();

        ResolveSheet {
            from: ticket.current_area,
            original_hardware: ticket.hardware.clone(),
            entries,
        }
    }

    pub fn from_area(&self) -> Area {
        self.from
    }

    pub fn entries(&self) -> &[ResolveEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut ResolveEntry> {
        self.entries
            .get_mut(index)
            .ok_or_else(|| RepairflowError::Validation(format!("no open action at index {}", index)))
    }

    pub fn set_resolved(&mut self, index: usize, resolved: bool) -> Result<()> {
        self.entry_mut(index)?.resolved = resolved;
        Ok(())
    }

    pub fn resolve_all(&mut self) {
        for entry in &mut self.entries {
            entry.resolved = true;
        }
    }

    pub fn set_real_cost(&mut self, index: usize, cost: f64) -> Result<()> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(RepairflowError::Validation(format!(
                "real cost for action {} must be a non-negative number",
                index
            )));
        }
        self.entry_mut(index)?.real_cost = cost;
        Ok(())
    }

    pub fn set_real_time(&mut self, index: usize, minutes: u32) -> Result<()> {
        self.entry_mut(index)?.real_time = minutes;
        Ok(())
    }

    /// Record the hardware actually installed for a hardware action
    pub fn confirm_hardware(&mut self, index: usize, final_state: HardwareConfig) -> Result<()> {
        let entry = self.entry_mut(index)?;
        if entry.action.hardware_change.is_none() {
            return Err(RepairflowError::Validation(format!(
                "action {} ('{}') has no hardware change to confirm",
                index, entry.action.text
            )));
        }
        entry.final_hardware = Some(final_state);
        Ok(())
    }

    pub fn comparison(&self, index: usize) -> Option<HardwareComparison> {
        let entry = self.entries.get(index)?;
        let change = entry.action.hardware_change.as_ref()?;
        let planned = change.apply_to(&self.original_hardware);
        Some(HardwareComparison {
            original: self.original_hardware.clone(),
            final_state: entry.final_hardware.clone().unwrap_or_else(|| planned.clone()),
            planned,
        })
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.resolved).count()
    }

    fn resolved_actions(&self) -> BTreeMap<usize, ResolvedAction> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.index,
                    ResolvedAction {
                        index: e.index,
                        action: e.action.clone(),
                        resolved: e.resolved,
                        real_cost: e.real_cost,
                        real_time: e.real_time,
                        final_hardware: if e.resolved {
                            e.final_hardware.clone()
                        } else {
                            None
                        },
                    },
                )
            })
            .collect()
    }

    /// Running totals over the entries marked resolved
    pub fn analysis(&self) -> RealDataAnalysis {
        RealDataAnalysis::from_resolved(self.resolved_actions().values())
    }

    pub fn finish(&self) -> Resolution {
        let resolved_actions = self.resolved_actions();
        let resolved_hardware = resolved_actions
            .values()
            .filter_map(|r| r.final_hardware.clone().map(|hw| (r.index, hw)))
            .collect();
        let unresolved = self
            .entries
            .iter()
            .filter(|e| !e.resolved)
            .map(|e| e.action.clone())
            .collect();
        Resolution {
            analysis: RealDataAnalysis::from_resolved(resolved_actions.values()),
            resolved_actions,
            resolved_hardware,
            unresolved,
        }
    }
}
