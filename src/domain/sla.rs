//! Service-level time budgets
//!
//! Elapsed time is measured in business time: every calendar day between
//! the area entry and `now` contributes its overlap, except the weekly rest
//! day which contributes nothing. Day boundaries follow the shop's fixed
//! UTC offset.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, Offset, TimeZone, Utc, Weekday};
use serde::Serialize;

use crate::errors::{RepairflowError, Result};
use crate::schemas::{Area, SlaConfig, Ticket};

/// Traffic-light status of an area's time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaStatus {
    Ok,
    Warning,
    Danger,
    /// The area has no configured limit
    Na,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SlaStatus::Ok => "ok",
            SlaStatus::Warning => "warning",
            SlaStatus::Danger => "danger",
            SlaStatus::Na => "na",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaReport {
    pub status: SlaStatus,
    pub elapsed: Duration,
    /// `limit - elapsed`; negative once the budget is exceeded
    pub remaining: Option<Duration>,
    pub limit: Option<Duration>,
}

impl SlaReport {
    /// How far past the limit the ticket is, if at all
    pub fn overdue(&self) -> Option<Duration> {
        self.remaining
            .filter(|r| *r < Duration::zero())
            .map(|r| -r)
    }

    pub fn usage_percent(&self) -> Option<f64> {
        usage_percent(self.elapsed, self.limit?)
    }
}

/// Share of `limit` consumed by `elapsed`; `None` for a non-positive limit
fn usage_percent(elapsed: Duration, limit: Duration) -> Option<f64> {
    if limit <= Duration::zero() {
        return None;
    }
    Some(elapsed.num_milliseconds() as f64 / limit.num_milliseconds() as f64 * 100.0)
}

/// Per-area limits plus the business calendar they are measured on
#[derive(Debug, Clone, PartialEq)]
pub struct SlaPolicy {
    limits: HashMap<Area, Duration>,
    rest_day: Weekday,
    offset: FixedOffset,
    warning_percent: f64,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        let config = SlaConfig::default();
        SlaPolicy {
            limits: config
                .limits_hours
                .iter()
                .map(|(area, hours)| (*area, Duration::hours(i64::from(*hours))))
                .collect(),
            rest_day: config.rest_day,
            offset: Utc.fix(),
            warning_percent: config.warning_percent,
        }
    }
}

impl SlaPolicy {
    /// Policy with no limits, Sunday rest day, UTC day boundaries
    pub fn empty() -> Self {
        SlaPolicy {
            limits: HashMap::new(),
            ..SlaPolicy::default()
        }
    }

    pub fn from_config(config: &SlaConfig) -> Result<Self> {
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                RepairflowError::ConfigError(format!(
                    "utc_offset_minutes out of range: {}",
                    config.utc_offset_minutes
                ))
            })?;
        if !(0.0..=100.0).contains(&config.warning_percent) {
            return Err(RepairflowError::ConfigError(format!(
                "warning_percent must be between 0 and 100, got {}",
                config.warning_percent
            )));
        }
        Ok(SlaPolicy {
            limits: config
                .limits_hours
                .iter()
                .map(|(area, hours)| (*area, Duration::hours(i64::from(*hours))))
                .collect(),
            rest_day: config.rest_day,
            offset,
            warning_percent: config.warning_percent,
        })
    }

    pub fn with_limit(mut self, area: Area, limit: Duration) -> Self {
        self.limits.insert(area, limit);
        self
    }

    pub fn with_rest_day(mut self, rest_day: Weekday) -> Self {
        self.rest_day = rest_day;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit_for(&self, area: Area) -> Option<Duration> {
        self.limits.get(&area).copied()
    }

    pub fn rest_day(&self) -> Weekday {
        self.rest_day
    }

    /// Business time between `start` and `end`, skipping the rest day
    pub fn business_elapsed(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let end = end.with_timezone(&self.offset);
        let mut cursor = start.with_timezone(&self.offset);
        let mut total = Duration::zero();

        while cursor < end {
            let day_end = next_midnight(&cursor).map_or(end, |m| m.min(end));
            if cursor.weekday() != self.rest_day {
                total = total + (day_end - cursor);
            }
            cursor = day_end;
        }
        total
    }

    /// SLA status of the ticket's current area at `now`
    pub fn status(&self, ticket: &Ticket, now: DateTime<Utc>) -> SlaReport {
        let elapsed = self.business_elapsed(ticket.area_entered_at(), now);
        let limit = match self.limit_for(ticket.current_area) {
            Some(limit) => limit,
            None => {
                return SlaReport {
                    status: SlaStatus::Na,
                    elapsed,
                    remaining: None,
                    limit: None,
                }
            }
        };

        let status = if elapsed > limit {
            SlaStatus::Danger
        } else if usage_percent(elapsed, limit).is_some_and(|p| p > self.warning_percent) {
            SlaStatus::Warning
        } else {
            SlaStatus::Ok
        };

        SlaReport {
            status,
            elapsed,
            remaining: Some(limit - elapsed),
            limit: Some(limit),
        }
    }
}

fn next_midnight(at: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let next_day = at.date_naive().succ_opt()?.and_hms_opt(0, 0, 0)?;
    at.offset().from_local_datetime(&next_day).single()
}

/// Render a duration as `2d 3h 15m`, with a leading `-` when negative
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total_minutes = duration.num_minutes().abs();
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;
    if days > 0 {
        format!("{}{}d {}h {}m", sign, days, hours, minutes)
    } else if hours > 0 {
        format!("{}{}h {}m", sign, hours, minutes)
    } else {
        format!("{}{}m", sign, minutes)
    }
}
