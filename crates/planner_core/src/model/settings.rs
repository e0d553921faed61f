//! Application settings and the cycle configuration projected from them.
//!
//! # Responsibility
//! - Describe the single settings row and its defaults.
//! - Project the cycle-relevant subset into [`CycleConfig`], the value the
//!   cycle calculator and week assembler consume.
//!
//! # Invariants
//! - Exactly one settings row exists per database.
//! - `cycle_length >= 1` and `periods_per_day` stays within 1..=12.

use super::{check_range, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIODS_PER_DAY: u32 = 6;
pub const DEFAULT_CYCLE_LENGTH: u32 = 10;
pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_SEMESTER: u8 = 1;
pub const MAX_PERIODS_PER_DAY: u32 = 12;

/// Persisted application settings (singleton row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of timetable periods in each school day.
    pub periods_per_day: u32,
    /// Academic year shown by default in subject lists.
    pub current_year: i32,
    /// Semester (1 or 2).
    pub current_semester: u8,
    /// Number of working days in one instructional cycle.
    pub cycle_length: u32,
    /// Date that counts as day 1 of the cycle. `None` means unconfigured.
    pub cycle_start_date: Option<NaiveDate>,
    /// Update timestamp in epoch milliseconds. Set by storage.
    pub updated_at: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            periods_per_day: DEFAULT_PERIODS_PER_DAY,
            current_year: DEFAULT_YEAR,
            current_semester: DEFAULT_SEMESTER,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            cycle_start_date: None,
            updated_at: 0,
        }
    }
}

impl Settings {
    /// Validates settings before they are persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(
            "periods_per_day",
            i64::from(self.periods_per_day),
            1,
            i64::from(MAX_PERIODS_PER_DAY),
        )?;
        check_range("current_semester", i64::from(self.current_semester), 1, 2)?;
        check_range(
            "cycle_length",
            i64::from(self.cycle_length),
            1,
            i64::from(u32::MAX),
        )?;
        Ok(())
    }

    /// Returns the cycle configuration value passed into the core.
    pub fn cycle_config(&self) -> CycleConfig {
        CycleConfig {
            cycle_start_date: self.cycle_start_date,
            cycle_length: self.cycle_length,
            periods_per_day: self.periods_per_day,
        }
    }
}

/// Cycle configuration consumed by cycle-day resolution and week assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Day 1 of the cycle. `None` selects the unconfigured fallback.
    pub cycle_start_date: Option<NaiveDate>,
    /// Cycle length in working days. Must be at least 1.
    pub cycle_length: u32,
    /// Carried through to the week view for grid rendering.
    pub periods_per_day: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Settings::default().cycle_config()
    }
}

impl CycleConfig {
    /// Builds a configured cycle anchored at `cycle_start_date`.
    pub fn starting(cycle_start_date: NaiveDate, cycle_length: u32) -> Self {
        Self {
            cycle_start_date: Some(cycle_start_date),
            cycle_length,
            ..Self::default()
        }
    }

    /// Returns whether a cycle anchor date is set.
    pub fn is_configured(&self) -> bool {
        self.cycle_start_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{CycleConfig, Settings};
    use chrono::NaiveDate;

    #[test]
    fn defaults_match_a_fresh_install() {
        let settings = Settings::default();
        assert_eq!(settings.periods_per_day, 6);
        assert_eq!(settings.cycle_length, 10);
        assert!(settings.cycle_start_date.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_cycle_length_and_bad_periods() {
        let mut settings = Settings {
            cycle_length: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.cycle_length = 7;
        settings.periods_per_day = 13;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn cycle_config_projects_cycle_fields() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        let settings = Settings {
            cycle_start_date: Some(start),
            cycle_length: 8,
            periods_per_day: 5,
            ..Settings::default()
        };

        let config = settings.cycle_config();
        assert_eq!(config.cycle_start_date, Some(start));
        assert_eq!(config.cycle_length, 8);
        assert_eq!(config.periods_per_day, 5);
        assert!(config.is_configured());
        assert!(!CycleConfig::default().is_configured());
    }
}
