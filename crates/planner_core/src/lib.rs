//! Core domain logic for the teacher planner.
//!
//! Stores subjects, lessons and per-lesson notes/resources/todos in SQLite,
//! and resolves dates onto the school's repeating "Week A/B" cycle to build
//! Monday-Friday week views.

pub mod cycle;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use cycle::{
    build_week, count_working_days, cycle_day_of, half_label_of, week_bounds, CyclePosition,
    DayView, WeekView,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::item::{Note, NoteId, Resource, ResourceId, Todo, TodoId};
pub use model::lesson::{Lesson, LessonId, LessonRecord};
pub use model::settings::{CycleConfig, Settings};
pub use model::subject::{Subject, SubjectId};
pub use model::ValidationError;
pub use repo::item_repo::{LessonItemRepository, SqliteLessonItemRepository};
pub use repo::lesson_repo::{LessonRepository, SqliteLessonRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::subject_repo::{SqliteSubjectRepository, SubjectListQuery, SubjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::lesson_item_service::{
    LessonItemService, LessonItemServiceError, NewNote, NewResource, NewTodo, NoteUpdate,
    ResourceUpdate, TodoUpdate,
};
pub use service::lesson_service::{LessonService, LessonServiceError, LessonUpdate, NewLesson};
pub use service::settings_service::{SettingsService, SettingsServiceError, SettingsUpdate};
pub use service::subject_service::{SubjectService, SubjectServiceError, SubjectUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
