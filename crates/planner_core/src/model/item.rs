//! Items attached to a lesson: notes, resources and todos.
//!
//! # Invariants
//! - Every item belongs to exactly one lesson and is deleted with it.
//! - `Todo::completed_at` is set iff `is_completed` (maintained by the
//!   lesson item service).

use super::lesson::LessonId;
use super::{check_max_chars, check_range, check_required, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NoteId = Uuid;
pub type ResourceId = Uuid;
pub type TodoId = Uuid;

/// Lesson plan, reflection or observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: NoteId,
    pub lesson_id: LessonId,
    pub title: Option<String>,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    pub fn new(lesson_id: LessonId, content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            lesson_id,
            title: None,
            content: content.into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("title", self.title.as_deref(), 200)?;
        check_required("content", &self.content, usize::MAX)
    }
}

/// Link, file reference or other teaching material.
///
/// `file_path` is an opaque reference; uploads are handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub uuid: ResourceId,
    pub lesson_id: LessonId,
    pub title: String,
    pub url: Option<String>,
    pub file_path: Option<String>,
    /// Free-form kind such as `link`, `pdf` or `video`.
    pub resource_type: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Resource {
    pub fn new(lesson_id: LessonId, title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            lesson_id,
            title: title.into(),
            url: None,
            file_path: None,
            resource_type: None,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("title", &self.title, 200)?;
        check_max_chars("url", self.url.as_deref(), 500)?;
        check_max_chars("file_path", self.file_path.as_deref(), 500)?;
        check_max_chars("resource_type", self.resource_type.as_deref(), 50)?;
        Ok(())
    }
}

/// Actionable follow-up for a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub uuid: TodoId,
    pub lesson_id: LessonId,
    pub content: String,
    pub is_completed: bool,
    /// Epoch milliseconds of the last completion.
    pub completed_at: Option<i64>,
    /// 1 = high, 2 = medium, 3 = low.
    pub priority: Option<u8>,
    pub due_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Todo {
    pub fn new(lesson_id: LessonId, content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            lesson_id,
            content: content.into(),
            is_completed: false,
            completed_at: None,
            priority: None,
            due_date: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("content", &self.content, 500)?;
        if let Some(priority) = self.priority {
            check_range("priority", i64::from(priority), 1, 3)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, Resource, Todo};
    use uuid::Uuid;

    #[test]
    fn empty_note_content_is_rejected() {
        assert!(Note::new(Uuid::new_v4(), " ").validate().is_err());
    }

    #[test]
    fn resource_requires_title() {
        assert!(Resource::new(Uuid::new_v4(), "").validate().is_err());
        assert!(Resource::new(Uuid::new_v4(), "Worksheet").validate().is_ok());
    }

    #[test]
    fn todo_priority_is_one_to_three() {
        let mut todo = Todo::new(Uuid::new_v4(), "Print worksheets");
        todo.priority = Some(4);
        assert!(todo.validate().is_err());
        todo.priority = Some(1);
        assert!(todo.validate().is_ok());
    }
}
