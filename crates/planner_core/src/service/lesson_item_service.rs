//! Lesson item use-case service (notes, resources, todos).
//!
//! # Responsibility
//! - Verify the parent lesson before touching its items.
//! - Maintain todo completion timestamps.
//!
//! # Invariants
//! - A todo has `completed_at` set exactly while `is_completed` is true.
//! - Re-completing an already completed todo keeps its original timestamp.

use crate::model::item::{Note, NoteId, Resource, ResourceId, Todo, TodoId};
use crate::model::lesson::LessonId;
use crate::model::ValidationError;
use crate::repo::item_repo::LessonItemRepository;
use crate::repo::RepoError;
use chrono::{NaiveDate, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for lesson item use-cases.
#[derive(Debug)]
pub enum LessonItemServiceError {
    InvalidItem(ValidationError),
    LessonNotFound(LessonId),
    /// Item missing, or attached to a different lesson.
    ItemNotFound { kind: &'static str, id: Uuid },
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for LessonItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItem(err) => write!(f, "invalid lesson item: {err}"),
            Self::LessonNotFound(id) => write!(f, "lesson not found: {id}"),
            Self::ItemNotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent lesson item state: {details}")
            }
        }
    }
}

impl Error for LessonItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidItem(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LessonItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidItem(err),
            RepoError::NotFound { entity, id } => Self::ItemNotFound { kind: entity, id },
            other => Self::Repo(other),
        }
    }
}

type ItemResult<T> = Result<T, LessonItemServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<Option<String>>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewResource {
    pub title: String,
    pub url: Option<String>,
    pub file_path: Option<String>,
    pub resource_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceUpdate {
    pub title: Option<String>,
    pub url: Option<Option<String>>,
    pub file_path: Option<Option<String>>,
    pub resource_type: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub content: String,
    pub is_completed: bool,
    pub priority: Option<u8>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub content: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<Option<u8>>,
    pub due_date: Option<Option<NaiveDate>>,
}

/// Lesson item service facade over a repository implementation.
pub struct LessonItemService<R: LessonItemRepository> {
    repo: R,
}

impl<R: LessonItemRepository> LessonItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_notes(&self, lesson_id: LessonId) -> ItemResult<Vec<Note>> {
        self.ensure_lesson(lesson_id)?;
        Ok(self.repo.list_notes(lesson_id)?)
    }

    pub fn add_note(&self, lesson_id: LessonId, request: NewNote) -> ItemResult<Note> {
        self.ensure_lesson(lesson_id)?;
        let mut note = Note::new(lesson_id, request.content);
        note.title = request.title;
        let id = self.repo.create_note(&note)?;
        info!("event=note_create module=lesson_item status=ok lesson_id={lesson_id} note_id={id}");
        self.repo
            .get_note(lesson_id, id)?
            .ok_or(LessonItemServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    pub fn get_note(&self, lesson_id: LessonId, note_id: NoteId) -> ItemResult<Note> {
        self.ensure_lesson(lesson_id)?;
        self.repo
            .get_note(lesson_id, note_id)?
            .ok_or(LessonItemServiceError::ItemNotFound {
                kind: "note",
                id: note_id,
            })
    }

    pub fn update_note(
        &self,
        lesson_id: LessonId,
        note_id: NoteId,
        update: NoteUpdate,
    ) -> ItemResult<Note> {
        let mut note = self.get_note(lesson_id, note_id)?;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        self.repo.update_note(&note)?;
        self.get_note(lesson_id, note_id)
    }

    pub fn delete_note(&self, lesson_id: LessonId, note_id: NoteId) -> ItemResult<()> {
        self.ensure_lesson(lesson_id)?;
        self.repo.delete_note(lesson_id, note_id)?;
        info!("event=note_delete module=lesson_item status=ok lesson_id={lesson_id} note_id={note_id}");
        Ok(())
    }

    pub fn list_resources(&self, lesson_id: LessonId) -> ItemResult<Vec<Resource>> {
        self.ensure_lesson(lesson_id)?;
        Ok(self.repo.list_resources(lesson_id)?)
    }

    pub fn add_resource(&self, lesson_id: LessonId, request: NewResource) -> ItemResult<Resource> {
        self.ensure_lesson(lesson_id)?;
        let mut resource = Resource::new(lesson_id, request.title);
        resource.url = request.url;
        resource.file_path = request.file_path;
        resource.resource_type = request.resource_type;
        resource.description = request.description;
        let id = self.repo.create_resource(&resource)?;
        info!(
            "event=resource_create module=lesson_item status=ok lesson_id={lesson_id} resource_id={id}"
        );
        self.repo
            .get_resource(lesson_id, id)?
            .ok_or(LessonItemServiceError::InconsistentState(
                "created resource not found in read-back",
            ))
    }

    pub fn get_resource(
        &self,
        lesson_id: LessonId,
        resource_id: ResourceId,
    ) -> ItemResult<Resource> {
        self.ensure_lesson(lesson_id)?;
        self.repo
            .get_resource(lesson_id, resource_id)?
            .ok_or(LessonItemServiceError::ItemNotFound {
                kind: "resource",
                id: resource_id,
            })
    }

    pub fn update_resource(
        &self,
        lesson_id: LessonId,
        resource_id: ResourceId,
        update: ResourceUpdate,
    ) -> ItemResult<Resource> {
        let mut resource = self.get_resource(lesson_id, resource_id)?;
        if let Some(title) = update.title {
            resource.title = title;
        }
        if let Some(url) = update.url {
            resource.url = url;
        }
        if let Some(file_path) = update.file_path {
            resource.file_path = file_path;
        }
        if let Some(resource_type) = update.resource_type {
            resource.resource_type = resource_type;
        }
        if let Some(description) = update.description {
            resource.description = description;
        }
        self.repo.update_resource(&resource)?;
        self.get_resource(lesson_id, resource_id)
    }

    pub fn delete_resource(&self, lesson_id: LessonId, resource_id: ResourceId) -> ItemResult<()> {
        self.ensure_lesson(lesson_id)?;
        self.repo.delete_resource(lesson_id, resource_id)?;
        info!(
            "event=resource_delete module=lesson_item status=ok lesson_id={lesson_id} resource_id={resource_id}"
        );
        Ok(())
    }

    /// Lists todos: incomplete first, then by priority, then oldest first.
    pub fn list_todos(&self, lesson_id: LessonId) -> ItemResult<Vec<Todo>> {
        self.ensure_lesson(lesson_id)?;
        Ok(self.repo.list_todos(lesson_id)?)
    }

    pub fn add_todo(&self, lesson_id: LessonId, request: NewTodo) -> ItemResult<Todo> {
        self.ensure_lesson(lesson_id)?;
        let mut todo = Todo::new(lesson_id, request.content);
        todo.priority = request.priority;
        todo.due_date = request.due_date;
        set_completion(&mut todo, request.is_completed);
        let id = self.repo.create_todo(&todo)?;
        info!("event=todo_create module=lesson_item status=ok lesson_id={lesson_id} todo_id={id}");
        self.repo
            .get_todo(lesson_id, id)?
            .ok_or(LessonItemServiceError::InconsistentState(
                "created todo not found in read-back",
            ))
    }

    pub fn get_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> ItemResult<Todo> {
        self.ensure_lesson(lesson_id)?;
        self.repo
            .get_todo(lesson_id, todo_id)?
            .ok_or(LessonItemServiceError::ItemNotFound {
                kind: "todo",
                id: todo_id,
            })
    }

    /// Applies a partial update, stamping or clearing `completed_at` when
    /// the completion flag changes.
    pub fn update_todo(
        &self,
        lesson_id: LessonId,
        todo_id: TodoId,
        update: TodoUpdate,
    ) -> ItemResult<Todo> {
        let mut todo = self.get_todo(lesson_id, todo_id)?;
        if let Some(content) = update.content {
            todo.content = content;
        }
        if let Some(priority) = update.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            todo.due_date = due_date;
        }
        if let Some(is_completed) = update.is_completed {
            set_completion(&mut todo, is_completed);
        }
        self.repo.update_todo(&todo)?;
        self.get_todo(lesson_id, todo_id)
    }

    /// Flips completion of a todo.
    pub fn toggle_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> ItemResult<Todo> {
        let current = self.get_todo(lesson_id, todo_id)?;
        let updated = self.update_todo(
            lesson_id,
            todo_id,
            TodoUpdate {
                is_completed: Some(!current.is_completed),
                ..TodoUpdate::default()
            },
        )?;
        info!(
            "event=todo_toggle module=lesson_item status=ok lesson_id={lesson_id} todo_id={todo_id} completed={}",
            updated.is_completed
        );
        Ok(updated)
    }

    pub fn delete_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> ItemResult<()> {
        self.ensure_lesson(lesson_id)?;
        self.repo.delete_todo(lesson_id, todo_id)?;
        info!("event=todo_delete module=lesson_item status=ok lesson_id={lesson_id} todo_id={todo_id}");
        Ok(())
    }

    fn ensure_lesson(&self, lesson_id: LessonId) -> ItemResult<()> {
        if !self.repo.lesson_exists(lesson_id)? {
            return Err(LessonItemServiceError::LessonNotFound(lesson_id));
        }
        Ok(())
    }
}

fn set_completion(todo: &mut Todo, is_completed: bool) {
    match (todo.is_completed, is_completed) {
        (false, true) => todo.completed_at = Some(Utc::now().timestamp_millis()),
        (_, false) => todo.completed_at = None,
        (true, true) => {
            if todo.completed_at.is_none() {
                todo.completed_at = Some(Utc::now().timestamp_millis());
            }
        }
    }
    todo.is_completed = is_completed;
}
