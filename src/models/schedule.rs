use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

/// One fixed-duration booking window definition, in minutes since local
/// midnight. `duration_minutes` is the length of each bookable unit carved
/// out of `[start_minute, end_minute)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    pub start_minute: i64,
    pub end_minute: i64,
    pub duration_minutes: i64,
}

impl SlotDefinition {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=1439).contains(&self.start_minute) {
            return Err(format!(
                "startMinute must be between 0 and 1439, got {}",
                self.start_minute
            ));
        }
        if self.end_minute > 1440 || self.end_minute <= self.start_minute {
            return Err(format!(
                "endMinute must be greater than startMinute and at most 1440, got {}",
                self.end_minute
            ));
        }
        if self.duration_minutes < 1 {
            return Err(format!(
                "durationMinutes must be positive, got {}",
                self.duration_minutes
            ));
        }
        Ok(())
    }
}

/// Recurring slots for one weekday. Weekday numbering follows the stored
/// documents: 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTemplate {
    pub weekday: i64,
    #[serde(default)]
    pub slots: Vec<SlotDefinition>,
}

/// Date-specific replacement for the weekday template. An empty `slots` list
/// closes the day entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub date: String,
    #[serde(default)]
    pub slots: Vec<SlotDefinition>,
}

/// The singleton schedule document. Replaced wholesale by the admin upsert,
/// never field-patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub days: Vec<WeekdayTemplate>,
    #[serde(default)]
    pub overrides: Vec<ScheduleOverride>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Schedule {
    pub fn empty() -> Self {
        Self {
            timezone: default_timezone(),
            days: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Structural validation for the admin upsert path. Overlapping slot
    /// definitions within one day are accepted; the booking guard collapses
    /// any double-exposed time to a single booking.
    pub fn validate(&self) -> Result<(), String> {
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(format!("Unknown timezone: {}", self.timezone));
        }

        let mut seen_weekdays = HashSet::new();
        for day in &self.days {
            if !(0..=6).contains(&day.weekday) {
                return Err(format!("weekday must be between 0 and 6, got {}", day.weekday));
            }
            if !seen_weekdays.insert(day.weekday) {
                return Err(format!("Duplicate weekday {}", day.weekday));
            }
            for slot in &day.slots {
                slot.validate()?;
            }
        }

        let mut seen_dates = HashSet::new();
        for override_entry in &self.overrides {
            if NaiveDate::parse_from_str(&override_entry.date, "%Y-%m-%d").is_err() {
                return Err(format!(
                    "Override date must be YYYY-MM-DD, got {}",
                    override_entry.date
                ));
            }
            if !seen_dates.insert(override_entry.date.as_str()) {
                return Err(format!("Duplicate override date {}", override_entry.date));
            }
            for slot in &override_entry.slots {
                slot.validate()?;
            }
        }

        Ok(())
    }
}

/// One bookable interval produced by the generator. Ephemeral, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSlot {
    pub starts_at: String,
    pub ends_at: String,
}
