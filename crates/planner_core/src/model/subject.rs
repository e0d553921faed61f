//! Subject domain model.
//!
//! # Responsibility
//! - Describe a taught class (for example "Year 11 Modern History").
//!
//! # Invariants
//! - `name` is non-empty and at most 200 characters.
//! - `colour`, when set, is a `#RRGGBB` hex string.
//! - Deleting a subject deletes its lessons (enforced by storage).

use super::{check_max_chars, check_range, check_required, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SubjectId = Uuid;

static HEX_COLOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid colour regex"));

/// A class the teacher is timetabled for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub uuid: SubjectId,
    pub name: String,
    /// Short code such as `11HIST`.
    pub code: Option<String>,
    /// Student year level (for example 9 to 12).
    pub year_level: Option<u8>,
    pub academic_year: i32,
    /// Semester (1 or 2).
    pub semester: u8,
    /// Default classroom.
    pub room: Option<String>,
    /// UI colour, `#RRGGBB`.
    pub colour: Option<String>,
    pub notes: Option<String>,
    /// Inactive subjects are kept for history but hidden from active lists.
    pub is_active: bool,
    /// Epoch milliseconds. Set by storage; ignored on writes.
    pub created_at: i64,
    /// Epoch milliseconds. Set by storage; ignored on writes.
    pub updated_at: i64,
}

impl Subject {
    /// Creates an active subject with a generated stable ID.
    pub fn new(name: impl Into<String>, academic_year: i32, semester: u8) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            code: None,
            year_level: None,
            academic_year,
            semester,
            room: None,
            colour: None,
            notes: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Validates field limits before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("name", &self.name, 200)?;
        check_max_chars("code", self.code.as_deref(), 20)?;
        check_max_chars("room", self.room.as_deref(), 50)?;
        check_range("semester", i64::from(self.semester), 1, 2)?;
        if let Some(colour) = self.colour.as_deref() {
            if !HEX_COLOUR_RE.is_match(colour) {
                return Err(ValidationError::InvalidColour(colour.to_string()));
            }
        }
        Ok(())
    }
}
