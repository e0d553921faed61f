//! Lesson domain model.
//!
//! # Responsibility
//! - Describe one timetabled lesson (date + period + subject).
//! - Describe the read model that carries a lesson with its resolved
//!   subject, notes, resources and todos.
//!
//! # Invariants
//! - At most one lesson exists per `(date, period)` slot (storage-enforced).
//! - `period >= 1`.

use super::item::{Note, Resource, Todo};
use super::subject::{Subject, SubjectId};
use super::{check_max_chars, check_range, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type LessonId = Uuid;

/// One timetable slot taught for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub uuid: LessonId,
    pub date: NaiveDate,
    /// 1-based period of the day.
    pub period: u32,
    pub subject_id: SubjectId,
    /// Cycle day stored at creation time, or a manual override.
    pub cycle_day: Option<u32>,
    /// Topic for this specific lesson.
    pub title: Option<String>,
    /// Epoch milliseconds. Set by storage; ignored on writes.
    pub created_at: i64,
    /// Epoch milliseconds. Set by storage; ignored on writes.
    pub updated_at: i64,
}

impl Lesson {
    /// Creates a lesson with a generated stable ID.
    pub fn new(date: NaiveDate, period: u32, subject_id: SubjectId) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            date,
            period,
            subject_id,
            cycle_day: None,
            title: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Validates field limits before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("period", i64::from(self.period), 1, i64::from(u32::MAX))?;
        check_max_chars("title", self.title.as_deref(), 200)?;
        Ok(())
    }
}

/// Lesson with its already-resolved subject and attached items.
///
/// Serialized flat: lesson fields sit next to `subject`, `notes`,
/// `resources` and `todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub subject: Option<Subject>,
    pub notes: Vec<Note>,
    pub resources: Vec<Resource>,
    pub todos: Vec<Todo>,
}

impl LessonRecord {
    /// Wraps a bare lesson without any nested data.
    pub fn bare(lesson: Lesson) -> Self {
        Self {
            lesson,
            subject: None,
            notes: Vec::new(),
            resources: Vec::new(),
            todos: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.lesson.date
    }

    pub fn period(&self) -> u32 {
        self.lesson.period
    }
}

#[cfg(test)]
mod tests {
    use super::{Lesson, LessonRecord};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn period_zero_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let lesson = Lesson::new(date, 0, Uuid::new_v4());
        assert!(lesson.validate().is_err());
    }

    #[test]
    fn record_serializes_lesson_fields_flat() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let mut lesson = Lesson::new(date, 3, Uuid::new_v4());
        lesson.title = Some("World War I - Causes".to_string());

        let value = serde_json::to_value(LessonRecord::bare(lesson)).unwrap();
        assert_eq!(value["date"], "2025-02-03");
        assert_eq!(value["period"], 3);
        assert_eq!(value["title"], "World War I - Causes");
        assert!(value["notes"].as_array().unwrap().is_empty());
    }
}
