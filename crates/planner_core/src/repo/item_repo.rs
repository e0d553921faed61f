//! Lesson item repository: notes, resources and todos.
//!
//! # Responsibility
//! - CRUD for items nested under one lesson.
//! - Provide bulk loaders used when assembling `LessonRecord`s.
//!
//! # Invariants
//! - Every lookup, update and delete is scoped by `(item uuid, lesson uuid)`;
//!   an item of another lesson is reported as not found.
//! - Notes/resources list newest first; todos list incomplete first, then
//!   by priority (unset last), then oldest first.

use super::{bool_to_int, ensure_tables, parse_bool, parse_uuid, RepoError, RepoResult};
use crate::model::item::{Note, NoteId, Resource, ResourceId, Todo, TodoId};
use crate::model::lesson::LessonId;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid, lesson_uuid, title, content, created_at, updated_at
FROM notes";

const RESOURCE_SELECT_SQL: &str = "SELECT
    uuid, lesson_uuid, title, url, file_path, resource_type, description, created_at, updated_at
FROM resources";

const TODO_SELECT_SQL: &str = "SELECT
    uuid, lesson_uuid, content, is_completed, completed_at, priority, due_date, created_at, updated_at
FROM todos";

const NOTE_ORDER_SQL: &str = "ORDER BY created_at DESC, rowid DESC";
const RESOURCE_ORDER_SQL: &str = "ORDER BY created_at DESC, rowid DESC";
const TODO_ORDER_SQL: &str =
    "ORDER BY is_completed ASC, priority IS NULL, priority ASC, created_at ASC, rowid ASC";

/// Repository interface for items attached to lessons.
pub trait LessonItemRepository {
    fn lesson_exists(&self, lesson_id: LessonId) -> RepoResult<bool>;

    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn get_note(&self, lesson_id: LessonId, note_id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self, lesson_id: LessonId) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, lesson_id: LessonId, note_id: NoteId) -> RepoResult<()>;

    fn create_resource(&self, resource: &Resource) -> RepoResult<ResourceId>;
    fn update_resource(&self, resource: &Resource) -> RepoResult<()>;
    fn get_resource(
        &self,
        lesson_id: LessonId,
        resource_id: ResourceId,
    ) -> RepoResult<Option<Resource>>;
    fn list_resources(&self, lesson_id: LessonId) -> RepoResult<Vec<Resource>>;
    fn delete_resource(&self, lesson_id: LessonId, resource_id: ResourceId) -> RepoResult<()>;

    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    fn update_todo(&self, todo: &Todo) -> RepoResult<()>;
    fn get_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> RepoResult<Option<Todo>>;
    fn list_todos(&self, lesson_id: LessonId) -> RepoResult<Vec<Todo>>;
    fn delete_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed lesson item repository.
pub struct SqliteLessonItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLessonItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["lessons", "notes", "resources", "todos"])?;
        Ok(Self { conn })
    }
}

impl LessonItemRepository for SqliteLessonItemRepository<'_> {
    fn lesson_exists(&self, lesson_id: LessonId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM lessons WHERE uuid = ?1);",
            [lesson_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        self.conn.execute(
            "INSERT INTO notes (uuid, lesson_uuid, title, content)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.uuid.to_string(),
                note.lesson_id.to_string(),
                note.title.as_deref(),
                note.content.as_str(),
            ],
        )?;
        Ok(note.uuid)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                content = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3 AND lesson_uuid = ?4;",
            params![
                note.title.as_deref(),
                note.content.as_str(),
                note.uuid.to_string(),
                note.lesson_id.to_string(),
            ],
        )?;
        ensure_changed(changed, "note", note.uuid)
    }

    fn get_note(&self, lesson_id: LessonId, note_id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE uuid = ?1 AND lesson_uuid = ?2;"
        ))?;
        let mut rows = stmt.query(params![note_id.to_string(), lesson_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self, lesson_id: LessonId) -> RepoResult<Vec<Note>> {
        load_notes(self.conn, &lesson_id.to_string())
    }

    fn delete_note(&self, lesson_id: LessonId, note_id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND lesson_uuid = ?2;",
            params![note_id.to_string(), lesson_id.to_string()],
        )?;
        ensure_changed(changed, "note", note_id)
    }

    fn create_resource(&self, resource: &Resource) -> RepoResult<ResourceId> {
        resource.validate()?;
        self.conn.execute(
            "INSERT INTO resources (
                uuid, lesson_uuid, title, url, file_path, resource_type, description
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                resource.uuid.to_string(),
                resource.lesson_id.to_string(),
                resource.title.trim(),
                resource.url.as_deref(),
                resource.file_path.as_deref(),
                resource.resource_type.as_deref(),
                resource.description.as_deref(),
            ],
        )?;
        Ok(resource.uuid)
    }

    fn update_resource(&self, resource: &Resource) -> RepoResult<()> {
        resource.validate()?;
        let changed = self.conn.execute(
            "UPDATE resources
             SET
                title = ?1,
                url = ?2,
                file_path = ?3,
                resource_type = ?4,
                description = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6 AND lesson_uuid = ?7;",
            params![
                resource.title.trim(),
                resource.url.as_deref(),
                resource.file_path.as_deref(),
                resource.resource_type.as_deref(),
                resource.description.as_deref(),
                resource.uuid.to_string(),
                resource.lesson_id.to_string(),
            ],
        )?;
        ensure_changed(changed, "resource", resource.uuid)
    }

    fn get_resource(
        &self,
        lesson_id: LessonId,
        resource_id: ResourceId,
    ) -> RepoResult<Option<Resource>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESOURCE_SELECT_SQL} WHERE uuid = ?1 AND lesson_uuid = ?2;"
        ))?;
        let mut rows = stmt.query(params![resource_id.to_string(), lesson_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resource_row(row)?));
        }
        Ok(None)
    }

    fn list_resources(&self, lesson_id: LessonId) -> RepoResult<Vec<Resource>> {
        load_resources(self.conn, &lesson_id.to_string())
    }

    fn delete_resource(&self, lesson_id: LessonId, resource_id: ResourceId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM resources WHERE uuid = ?1 AND lesson_uuid = ?2;",
            params![resource_id.to_string(), lesson_id.to_string()],
        )?;
        ensure_changed(changed, "resource", resource_id)
    }

    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        todo.validate()?;
        self.conn.execute(
            "INSERT INTO todos (
                uuid, lesson_uuid, content, is_completed, completed_at, priority, due_date
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                todo.uuid.to_string(),
                todo.lesson_id.to_string(),
                todo.content.trim(),
                bool_to_int(todo.is_completed),
                todo.completed_at,
                todo.priority,
                todo.due_date,
            ],
        )?;
        Ok(todo.uuid)
    }

    fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
        todo.validate()?;
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                content = ?1,
                is_completed = ?2,
                completed_at = ?3,
                priority = ?4,
                due_date = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6 AND lesson_uuid = ?7;",
            params![
                todo.content.trim(),
                bool_to_int(todo.is_completed),
                todo.completed_at,
                todo.priority,
                todo.due_date,
                todo.uuid.to_string(),
                todo.lesson_id.to_string(),
            ],
        )?;
        ensure_changed(changed, "todo", todo.uuid)
    }

    fn get_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} WHERE uuid = ?1 AND lesson_uuid = ?2;"
        ))?;
        let mut rows = stmt.query(params![todo_id.to_string(), lesson_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn list_todos(&self, lesson_id: LessonId) -> RepoResult<Vec<Todo>> {
        load_todos(self.conn, &lesson_id.to_string())
    }

    fn delete_todo(&self, lesson_id: LessonId, todo_id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM todos WHERE uuid = ?1 AND lesson_uuid = ?2;",
            params![todo_id.to_string(), lesson_id.to_string()],
        )?;
        ensure_changed(changed, "todo", todo_id)
    }
}

pub(crate) fn load_notes(conn: &Connection, lesson_uuid: &str) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT_SQL} WHERE lesson_uuid = ?1 {NOTE_ORDER_SQL};"
    ))?;
    let mut rows = stmt.query([lesson_uuid])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}

pub(crate) fn load_resources(conn: &Connection, lesson_uuid: &str) -> RepoResult<Vec<Resource>> {
    let mut stmt = conn.prepare(&format!(
        "{RESOURCE_SELECT_SQL} WHERE lesson_uuid = ?1 {RESOURCE_ORDER_SQL};"
    ))?;
    let mut rows = stmt.query([lesson_uuid])?;
    let mut resources = Vec::new();
    while let Some(row) = rows.next()? {
        resources.push(parse_resource_row(row)?);
    }
    Ok(resources)
}

pub(crate) fn load_todos(conn: &Connection, lesson_uuid: &str) -> RepoResult<Vec<Todo>> {
    let mut stmt = conn.prepare(&format!(
        "{TODO_SELECT_SQL} WHERE lesson_uuid = ?1 {TODO_ORDER_SQL};"
    ))?;
    let mut rows = stmt.query([lesson_uuid])?;
    let mut todos = Vec::new();
    while let Some(row) = rows.next()? {
        todos.push(parse_todo_row(row)?);
    }
    Ok(todos)
}

fn ensure_changed(changed: usize, entity: &'static str, id: Uuid) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let lesson_text: String = row.get("lesson_uuid")?;
    Ok(Note {
        uuid: parse_uuid(&uuid_text, "notes.uuid")?,
        lesson_id: parse_uuid(&lesson_text, "notes.lesson_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_resource_row(row: &Row<'_>) -> RepoResult<Resource> {
    let uuid_text: String = row.get("uuid")?;
    let lesson_text: String = row.get("lesson_uuid")?;
    Ok(Resource {
        uuid: parse_uuid(&uuid_text, "resources.uuid")?,
        lesson_id: parse_uuid(&lesson_text, "resources.lesson_uuid")?,
        title: row.get("title")?,
        url: row.get("url")?,
        file_path: row.get("file_path")?,
        resource_type: row.get("resource_type")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let lesson_text: String = row.get("lesson_uuid")?;
    let todo = Todo {
        uuid: parse_uuid(&uuid_text, "todos.uuid")?,
        lesson_id: parse_uuid(&lesson_text, "todos.lesson_uuid")?,
        content: row.get("content")?,
        is_completed: parse_bool(row.get("is_completed")?, "todos.is_completed")?,
        completed_at: row.get("completed_at")?,
        priority: row.get("priority")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate()?;
    Ok(todo)
}
