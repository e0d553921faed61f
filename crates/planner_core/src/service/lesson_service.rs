//! Lesson use-case service.
//!
//! # Responsibility
//! - Enforce lesson write rules: the subject must exist and a
//!   `(date, period)` slot holds at most one lesson.
//! - Stamp the cycle day on new lessons when the cycle is configured.
//! - Fetch one week of lessons and hand them to the week assembler.
//!
//! # Invariants
//! - The cycle configuration is passed in explicitly; this service never
//!   reads settings on its own.
//! - Slot and subject checks happen before any SQL mutation.

use crate::cycle::{build_week, cycle_day_of, week_bounds, CyclePosition, WeekView};
use crate::model::lesson::{Lesson, LessonId, LessonRecord};
use crate::model::settings::CycleConfig;
use crate::model::subject::SubjectId;
use crate::model::ValidationError;
use crate::repo::lesson_repo::LessonRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for lesson use-cases.
#[derive(Debug)]
pub enum LessonServiceError {
    InvalidLesson(ValidationError),
    LessonNotFound(LessonId),
    /// Referenced subject does not exist.
    SubjectNotFound(SubjectId),
    /// Another lesson already occupies the slot.
    SlotTaken { date: NaiveDate, period: u32 },
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for LessonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLesson(err) => write!(f, "invalid lesson: {err}"),
            Self::LessonNotFound(id) => write!(f, "lesson not found: {id}"),
            Self::SubjectNotFound(id) => write!(f, "subject not found: {id}"),
            Self::SlotTaken { date, period } => {
                write!(f, "a lesson already exists for {date} period {period}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent lesson state: {details}"),
        }
    }
}

impl Error for LessonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLesson(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LessonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidLesson(err),
            RepoError::NotFound {
                entity: "lesson",
                id,
            } => Self::LessonNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    pub date: NaiveDate,
    pub period: u32,
    pub subject_id: SubjectId,
    /// Manual cycle day; computed from the cycle when `None`.
    pub cycle_day: Option<u32>,
    pub title: Option<String>,
}

/// Partial lesson update. For nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonUpdate {
    pub date: Option<NaiveDate>,
    pub period: Option<u32>,
    pub subject_id: Option<SubjectId>,
    pub cycle_day: Option<Option<u32>>,
    pub title: Option<Option<String>>,
}

/// Lesson service facade over a repository implementation.
pub struct LessonService<R: LessonRepository> {
    repo: R,
}

impl<R: LessonRepository> LessonService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a lesson after subject and slot checks.
    ///
    /// When `request.cycle_day` is `None` and `config` has a cycle start
    /// date, the computed cycle day is stored with the lesson.
    pub fn create_lesson(
        &self,
        request: NewLesson,
        config: &CycleConfig,
    ) -> Result<LessonRecord, LessonServiceError> {
        self.ensure_subject(request.subject_id)?;
        self.ensure_slot_free(request.date, request.period, None)?;

        let mut lesson = Lesson::new(request.date, request.period, request.subject_id);
        lesson.cycle_day = request
            .cycle_day
            .or_else(|| cycle_day_of(request.date, config));
        lesson.title = request.title;

        let id = self.repo.create_lesson(&lesson)?;
        info!(
            "event=lesson_create module=lesson status=ok lesson_id={id} period={} cycle_day_set={}",
            lesson.period,
            lesson.cycle_day.is_some()
        );
        self.repo
            .get_lesson_record(id)?
            .ok_or(LessonServiceError::InconsistentState(
                "created lesson not found in read-back",
            ))
    }

    /// Gets one lesson with its subject, notes, resources and todos.
    pub fn get_lesson(&self, id: LessonId) -> Result<LessonRecord, LessonServiceError> {
        self.repo
            .get_lesson_record(id)?
            .ok_or(LessonServiceError::LessonNotFound(id))
    }

    /// Applies a partial update.
    ///
    /// A changed subject must exist; a changed date or period must land on a
    /// free slot. The stored cycle day is left as is unless provided.
    pub fn update_lesson(
        &self,
        id: LessonId,
        update: LessonUpdate,
    ) -> Result<LessonRecord, LessonServiceError> {
        let mut lesson = self
            .repo
            .get_lesson(id)?
            .ok_or(LessonServiceError::LessonNotFound(id))?;

        if let Some(subject_id) = update.subject_id {
            if subject_id != lesson.subject_id {
                self.ensure_subject(subject_id)?;
            }
            lesson.subject_id = subject_id;
        }

        let date = update.date.unwrap_or(lesson.date);
        let period = update.period.unwrap_or(lesson.period);
        if date != lesson.date || period != lesson.period {
            self.ensure_slot_free(date, period, Some(id))?;
        }
        lesson.date = date;
        lesson.period = period;

        if let Some(cycle_day) = update.cycle_day {
            lesson.cycle_day = cycle_day;
        }
        if let Some(title) = update.title {
            lesson.title = title;
        }

        self.repo.update_lesson(&lesson)?;
        info!("event=lesson_update module=lesson status=ok lesson_id={id}");
        self.get_lesson(id)
    }

    /// Deletes a lesson together with its notes, resources and todos.
    pub fn delete_lesson(&self, id: LessonId) -> Result<(), LessonServiceError> {
        self.repo.delete_lesson(id)?;
        info!("event=lesson_delete module=lesson status=ok lesson_id={id}");
        Ok(())
    }

    /// Builds the Monday-Friday view for the week containing `requested`.
    pub fn week_view(
        &self,
        requested: NaiveDate,
        config: &CycleConfig,
    ) -> Result<WeekView, LessonServiceError> {
        let (week_start, week_end) = week_bounds(requested);
        let lessons = self.repo.list_lesson_records(week_start, week_end)?;
        debug!(
            "event=week_view module=lesson status=ok week_start={week_start} lesson_count={} cycle_configured={}",
            lessons.len(),
            config.is_configured()
        );
        Ok(build_week(requested, config, lessons))
    }

    /// Resolves the cycle position of `date`, falling back to
    /// [`CyclePosition::UNCONFIGURED`] when the cycle has no start date.
    pub fn cycle_day(&self, date: NaiveDate, config: &CycleConfig) -> CyclePosition {
        CyclePosition::resolve(date, config)
    }

    /// Lists lessons with nested data for an inclusive date range, ordered
    /// by date then period. A reversed range covers the same days.
    pub fn list_lessons(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LessonRecord>, LessonServiceError> {
        let (from, to) = if to < from { (to, from) } else { (from, to) };
        let lessons = self.repo.list_lesson_records(from, to)?;
        debug!(
            "event=lesson_list module=lesson status=ok from={from} to={to} lesson_count={}",
            lessons.len()
        );
        Ok(lessons)
    }

    fn ensure_subject(&self, subject_id: SubjectId) -> Result<(), LessonServiceError> {
        if !self.repo.subject_exists(subject_id)? {
            return Err(LessonServiceError::SubjectNotFound(subject_id));
        }
        Ok(())
    }

    fn ensure_slot_free(
        &self,
        date: NaiveDate,
        period: u32,
        moving: Option<LessonId>,
    ) -> Result<(), LessonServiceError> {
        match self.repo.find_lesson_in_slot(date, period)? {
            Some(existing) if Some(existing) != moving => {
                Err(LessonServiceError::SlotTaken { date, period })
            }
            _ => Ok(()),
        }
    }
}
