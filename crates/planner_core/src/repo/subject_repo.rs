//! Subject repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `subjects` table with optional list filters.
//!
//! # Invariants
//! - Deleting a subject cascades to its lessons and their items.
//! - Lists are ordered by year level (unset last), then name.

use super::{bool_to_int, ensure_tables, parse_bool, parse_uuid, RepoError, RepoResult};
use crate::model::subject::{Subject, SubjectId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

pub(crate) const SUBJECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    code,
    year_level,
    academic_year,
    semester,
    room,
    colour,
    notes,
    is_active,
    created_at,
    updated_at
FROM subjects";

/// Filters for listing subjects. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectListQuery {
    pub academic_year: Option<i32>,
    pub semester: Option<u8>,
    pub is_active: Option<bool>,
    pub year_level: Option<u8>,
}

/// Repository interface for subject CRUD operations.
pub trait SubjectRepository {
    fn create_subject(&self, subject: &Subject) -> RepoResult<SubjectId>;
    fn update_subject(&self, subject: &Subject) -> RepoResult<()>;
    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>>;
    fn list_subjects(&self, query: &SubjectListQuery) -> RepoResult<Vec<Subject>>;
    /// Hard-deletes a subject and, through cascades, its lessons.
    fn delete_subject(&self, id: SubjectId) -> RepoResult<()>;
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["subjects"])?;
        Ok(Self { conn })
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn create_subject(&self, subject: &Subject) -> RepoResult<SubjectId> {
        subject.validate()?;

        self.conn.execute(
            "INSERT INTO subjects (
                uuid,
                name,
                code,
                year_level,
                academic_year,
                semester,
                room,
                colour,
                notes,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                subject.uuid.to_string(),
                subject.name.trim(),
                subject.code.as_deref(),
                subject.year_level,
                subject.academic_year,
                subject.semester,
                subject.room.as_deref(),
                subject.colour.as_deref(),
                subject.notes.as_deref(),
                bool_to_int(subject.is_active),
            ],
        )?;

        Ok(subject.uuid)
    }

    fn update_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;

        let changed = self.conn.execute(
            "UPDATE subjects
             SET
                name = ?1,
                code = ?2,
                year_level = ?3,
                academic_year = ?4,
                semester = ?5,
                room = ?6,
                colour = ?7,
                notes = ?8,
                is_active = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?10;",
            params![
                subject.name.trim(),
                subject.code.as_deref(),
                subject.year_level,
                subject.academic_year,
                subject.semester,
                subject.room.as_deref(),
                subject.colour.as_deref(),
                subject.notes.as_deref(),
                bool_to_int(subject.is_active),
                subject.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "subject",
                id: subject.uuid,
            });
        }
        Ok(())
    }

    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>> {
        load_subject(self.conn, &id.to_string())
    }

    fn list_subjects(&self, query: &SubjectListQuery) -> RepoResult<Vec<Subject>> {
        let mut sql = format!("{SUBJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(academic_year) = query.academic_year {
            sql.push_str(" AND academic_year = ?");
            bind_values.push(Value::Integer(i64::from(academic_year)));
        }
        if let Some(semester) = query.semester {
            sql.push_str(" AND semester = ?");
            bind_values.push(Value::Integer(i64::from(semester)));
        }
        if let Some(is_active) = query.is_active {
            sql.push_str(" AND is_active = ?");
            bind_values.push(Value::Integer(bool_to_int(is_active)));
        }
        if let Some(year_level) = query.year_level {
            sql.push_str(" AND year_level = ?");
            bind_values.push(Value::Integer(i64::from(year_level)));
        }

        sql.push_str(" ORDER BY year_level IS NULL, year_level ASC, name COLLATE NOCASE ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }

    fn delete_subject(&self, id: SubjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM subjects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "subject",
                id,
            });
        }
        Ok(())
    }
}

pub(crate) fn load_subject(conn: &Connection, subject_uuid: &str) -> RepoResult<Option<Subject>> {
    let mut stmt = conn.prepare(&format!("{SUBJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([subject_uuid])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_subject_row(row)?));
    }
    Ok(None)
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let uuid_text: String = row.get("uuid")?;
    let subject = Subject {
        uuid: parse_uuid(&uuid_text, "subjects.uuid")?,
        name: row.get("name")?,
        code: row.get("code")?,
        year_level: row.get("year_level")?,
        academic_year: row.get("academic_year")?,
        semester: row.get("semester")?,
        room: row.get("room")?,
        colour: row.get("colour")?,
        notes: row.get("notes")?,
        is_active: parse_bool(row.get("is_active")?, "subjects.is_active")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    subject.validate()?;
    Ok(subject)
}
