//! Settings use-case service.
//!
//! # Responsibility
//! - Materialize default settings on first access.
//! - Apply partial updates and hand out the current [`CycleConfig`].
//!
//! # Invariants
//! - Callers never observe a missing settings row.
//! - Invalid settings are rejected before persistence.

use crate::model::settings::{CycleConfig, Settings, MAX_PERIODS_PER_DAY};
use crate::model::ValidationError;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for settings use-cases.
#[derive(Debug)]
pub enum SettingsServiceError {
    /// Requested settings violate field constraints.
    InvalidSettings(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Settings row missing right after it was written.
    InconsistentState(&'static str),
}

impl Display for SettingsServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSettings(err) => write!(f, "invalid settings: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent settings state: {details}"),
        }
    }
}

impl Error for SettingsServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSettings(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for SettingsServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidSettings(err),
            other => Self::Repo(other),
        }
    }
}

/// Partial settings update. `None` leaves a field unchanged.
///
/// `cycle_start_date: Some(None)` clears the cycle anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub periods_per_day: Option<u32>,
    pub current_year: Option<i32>,
    pub current_semester: Option<u8>,
    pub cycle_length: Option<u32>,
    pub cycle_start_date: Option<Option<NaiveDate>>,
}

impl SettingsUpdate {
    fn apply_to(self, settings: &mut Settings) {
        if let Some(value) = self.periods_per_day {
            settings.periods_per_day = value;
        }
        if let Some(value) = self.current_year {
            settings.current_year = value;
        }
        if let Some(value) = self.current_semester {
            settings.current_semester = value;
        }
        if let Some(value) = self.cycle_length {
            settings.cycle_length = value;
        }
        if let Some(value) = self.cycle_start_date {
            settings.cycle_start_date = value;
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Settings service facade over a repository implementation.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the settings row, inserting defaults when absent.
    pub fn get_or_create(&self) -> Result<Settings, SettingsServiceError> {
        if let Some(settings) = self.repo.load_settings()? {
            return Ok(settings);
        }

        self.repo.save_settings(&Settings::default())?;
        info!("event=settings_init module=settings status=ok");
        self.read_back("default settings not found in read-back")
    }

    /// Applies a partial update and returns the stored result.
    pub fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsServiceError> {
        let mut settings = self.get_or_create()?;
        if update.is_empty() {
            return Ok(settings);
        }

        let anchor_changed = update.cycle_start_date.is_some() || update.cycle_length.is_some();
        update.apply_to(&mut settings);
        self.repo.save_settings(&settings)?;
        info!(
            "event=settings_update module=settings status=ok cycle_changed={anchor_changed} cycle_configured={}",
            settings.cycle_start_date.is_some()
        );
        self.read_back("updated settings not found in read-back")
    }

    /// Sets only the number of periods per day (1..=12).
    pub fn set_periods_per_day(&self, periods: u32) -> Result<Settings, SettingsServiceError> {
        if periods == 0 || periods > MAX_PERIODS_PER_DAY {
            return Err(SettingsServiceError::InvalidSettings(
                ValidationError::OutOfRange {
                    field: "periods_per_day",
                    value: i64::from(periods),
                    min: 1,
                    max: i64::from(MAX_PERIODS_PER_DAY),
                },
            ));
        }
        self.update(SettingsUpdate {
            periods_per_day: Some(periods),
            ..SettingsUpdate::default()
        })
    }

    /// Returns the cycle configuration for the core calculators.
    pub fn cycle_config(&self) -> Result<CycleConfig, SettingsServiceError> {
        Ok(self.get_or_create()?.cycle_config())
    }

    fn read_back(&self, details: &'static str) -> Result<Settings, SettingsServiceError> {
        self.repo
            .load_settings()?
            .ok_or(SettingsServiceError::InconsistentState(details))
    }
}
