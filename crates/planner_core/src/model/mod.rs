//! Planner domain model.
//!
//! # Responsibility
//! - Define the records persisted by the planner store (settings, subjects,
//!   lessons and their notes/resources/todos).
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every persisted record except settings is identified by a stable UUID.
//! - Nested collections on [`lesson::LessonRecord`] are plain resolved data,
//!   never live references back into storage.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod item;
pub mod lesson;
pub mod settings;
pub mod subject;

/// Field-level validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    Empty { field: &'static str },
    /// Text field exceeds its storage limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    /// Numeric field is outside its accepted inclusive range.
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// Colour is not a `#RRGGBB` hex string.
    InvalidColour(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be between {min} and {max}, got {value}"),
            Self::InvalidColour(value) => {
                write!(f, "colour must be a #RRGGBB hex value, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_required(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    check_max_chars(field, Some(value), max_chars)
}

pub(crate) fn check_max_chars(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.chars().count() > max_chars => {
            Err(ValidationError::TooLong { field, max_chars })
        }
        _ => Ok(()),
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_max_chars, check_range, check_required, ValidationError};

    #[test]
    fn required_rejects_whitespace_only() {
        assert_eq!(
            check_required("name", "   ", 10),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        assert!(check_max_chars("room", Some("äöü"), 3).is_ok());
        assert!(check_max_chars("room", Some("äöüß"), 3).is_err());
        assert!(check_max_chars("room", None, 0).is_ok());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(check_range("period", 1, 1, 12).is_ok());
        assert!(check_range("period", 12, 1, 12).is_ok());
        assert!(check_range("period", 13, 1, 12).is_err());
    }
}
