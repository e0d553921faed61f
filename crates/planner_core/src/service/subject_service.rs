//! Subject use-case service.
//!
//! # Responsibility
//! - Create, read, partially update, list and delete subjects.
//!
//! # Invariants
//! - Writes return the stored record via read-back.
//! - Deleting a subject removes its lessons (storage cascade).

use crate::model::subject::{Subject, SubjectId};
use crate::model::ValidationError;
use crate::repo::subject_repo::{SubjectListQuery, SubjectRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for subject use-cases.
#[derive(Debug)]
pub enum SubjectServiceError {
    InvalidSubject(ValidationError),
    SubjectNotFound(SubjectId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for SubjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSubject(err) => write!(f, "invalid subject: {err}"),
            Self::SubjectNotFound(id) => write!(f, "subject not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent subject state: {details}"),
        }
    }
}

impl Error for SubjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSubject(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SubjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidSubject(err),
            RepoError::NotFound { id, .. } => Self::SubjectNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Partial subject update. Outer `None` leaves a field unchanged; for
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectUpdate {
    pub name: Option<String>,
    pub code: Option<Option<String>>,
    pub year_level: Option<Option<u8>>,
    pub academic_year: Option<i32>,
    pub semester: Option<u8>,
    pub room: Option<Option<String>>,
    pub colour: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl SubjectUpdate {
    fn apply_to(self, subject: &mut Subject) {
        if let Some(value) = self.name {
            subject.name = value;
        }
        if let Some(value) = self.code {
            subject.code = value;
        }
        if let Some(value) = self.year_level {
            subject.year_level = value;
        }
        if let Some(value) = self.academic_year {
            subject.academic_year = value;
        }
        if let Some(value) = self.semester {
            subject.semester = value;
        }
        if let Some(value) = self.room {
            subject.room = value;
        }
        if let Some(value) = self.colour {
            subject.colour = value;
        }
        if let Some(value) = self.notes {
            subject.notes = value;
        }
        if let Some(value) = self.is_active {
            subject.is_active = value;
        }
    }
}

/// Subject service facade over a repository implementation.
pub struct SubjectService<R: SubjectRepository> {
    repo: R,
}

impl<R: SubjectRepository> SubjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new subject and returns the stored record.
    pub fn create_subject(&self, subject: &Subject) -> Result<Subject, SubjectServiceError> {
        let id = self.repo.create_subject(subject)?;
        info!("event=subject_create module=subject status=ok subject_id={id}");
        self.repo
            .get_subject(id)?
            .ok_or(SubjectServiceError::InconsistentState(
                "created subject not found in read-back",
            ))
    }

    pub fn get_subject(&self, id: SubjectId) -> Result<Subject, SubjectServiceError> {
        self.repo
            .get_subject(id)?
            .ok_or(SubjectServiceError::SubjectNotFound(id))
    }

    pub fn list_subjects(
        &self,
        query: &SubjectListQuery,
    ) -> Result<Vec<Subject>, SubjectServiceError> {
        Ok(self.repo.list_subjects(query)?)
    }

    /// Applies a partial update and returns the stored record.
    pub fn update_subject(
        &self,
        id: SubjectId,
        update: SubjectUpdate,
    ) -> Result<Subject, SubjectServiceError> {
        let mut subject = self.get_subject(id)?;
        update.apply_to(&mut subject);
        self.repo.update_subject(&subject)?;
        info!("event=subject_update module=subject status=ok subject_id={id}");
        self.get_subject(id)
    }

    /// Deletes a subject together with its lessons.
    pub fn delete_subject(&self, id: SubjectId) -> Result<(), SubjectServiceError> {
        self.repo.delete_subject(id)?;
        info!("event=subject_delete module=subject status=ok subject_id={id}");
        Ok(())
    }
}
