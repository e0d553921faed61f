//! Lesson repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `lessons` table.
//! - Load `LessonRecord`s with subject, notes, resources and todos resolved
//!   into plain nested data.
//!
//! # Invariants
//! - `(date, period)` is unique; the UNIQUE index is the last line of
//!   defence behind the service-level slot check.
//! - Range listings are ordered by `date ASC, period ASC`.

use super::item_repo::{load_notes, load_resources, load_todos};
use super::subject_repo::load_subject;
use super::{ensure_tables, parse_uuid, RepoError, RepoResult};
use crate::model::lesson::{Lesson, LessonId, LessonRecord};
use crate::model::subject::SubjectId;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const LESSON_SELECT_SQL: &str = "SELECT
    uuid,
    date,
    period,
    subject_uuid,
    cycle_day,
    title,
    created_at,
    updated_at
FROM lessons";

/// Repository interface for lesson operations.
pub trait LessonRepository {
    fn create_lesson(&self, lesson: &Lesson) -> RepoResult<LessonId>;
    fn update_lesson(&self, lesson: &Lesson) -> RepoResult<()>;
    fn get_lesson(&self, id: LessonId) -> RepoResult<Option<Lesson>>;
    /// Gets one lesson with its nested subject and items.
    fn get_lesson_record(&self, id: LessonId) -> RepoResult<Option<LessonRecord>>;
    /// Returns the lesson occupying `(date, period)`, if any.
    fn find_lesson_in_slot(&self, date: NaiveDate, period: u32) -> RepoResult<Option<LessonId>>;
    /// Lists lessons with nested data for `from..=to`.
    fn list_lesson_records(&self, from: NaiveDate, to: NaiveDate)
        -> RepoResult<Vec<LessonRecord>>;
    /// Hard-deletes a lesson and, through cascades, its items.
    fn delete_lesson(&self, id: LessonId) -> RepoResult<()>;
    fn subject_exists(&self, subject_id: SubjectId) -> RepoResult<bool>;
}

/// SQLite-backed lesson repository.
pub struct SqliteLessonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLessonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &["subjects", "lessons", "notes", "resources", "todos"],
        )?;
        Ok(Self { conn })
    }

    fn resolve_record(&self, lesson: Lesson) -> RepoResult<LessonRecord> {
        let lesson_uuid = lesson.uuid.to_string();
        Ok(LessonRecord {
            subject: load_subject(self.conn, &lesson.subject_id.to_string())?,
            notes: load_notes(self.conn, &lesson_uuid)?,
            resources: load_resources(self.conn, &lesson_uuid)?,
            todos: load_todos(self.conn, &lesson_uuid)?,
            lesson,
        })
    }
}

impl LessonRepository for SqliteLessonRepository<'_> {
    fn create_lesson(&self, lesson: &Lesson) -> RepoResult<LessonId> {
        lesson.validate()?;

        self.conn.execute(
            "INSERT INTO lessons (
                uuid,
                date,
                period,
                subject_uuid,
                cycle_day,
                title
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                lesson.uuid.to_string(),
                lesson.date,
                lesson.period,
                lesson.subject_id.to_string(),
                lesson.cycle_day,
                lesson.title.as_deref(),
            ],
        )?;

        Ok(lesson.uuid)
    }

    fn update_lesson(&self, lesson: &Lesson) -> RepoResult<()> {
        lesson.validate()?;

        let changed = self.conn.execute(
            "UPDATE lessons
             SET
                date = ?1,
                period = ?2,
                subject_uuid = ?3,
                cycle_day = ?4,
                title = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                lesson.date,
                lesson.period,
                lesson.subject_id.to_string(),
                lesson.cycle_day,
                lesson.title.as_deref(),
                lesson.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "lesson",
                id: lesson.uuid,
            });
        }
        Ok(())
    }

    fn get_lesson(&self, id: LessonId) -> RepoResult<Option<Lesson>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LESSON_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_lesson_row(row)?));
        }
        Ok(None)
    }

    fn get_lesson_record(&self, id: LessonId) -> RepoResult<Option<LessonRecord>> {
        match self.get_lesson(id)? {
            Some(lesson) => Ok(Some(self.resolve_record(lesson)?)),
            None => Ok(None),
        }
    }

    fn find_lesson_in_slot(&self, date: NaiveDate, period: u32) -> RepoResult<Option<LessonId>> {
        let uuid_text: Option<String> = self
            .conn
            .query_row(
                "SELECT uuid FROM lessons WHERE date = ?1 AND period = ?2;",
                params![date, period],
                |row| row.get(0),
            )
            .optional()?;
        uuid_text
            .map(|value| parse_uuid(&value, "lessons.uuid"))
            .transpose()
    }

    fn list_lesson_records(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<LessonRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LESSON_SELECT_SQL}
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC, period ASC;"
        ))?;
        let mut rows = stmt.query(params![from, to])?;
        let mut lessons = Vec::new();
        while let Some(row) = rows.next()? {
            lessons.push(parse_lesson_row(row)?);
        }

        lessons
            .into_iter()
            .map(|lesson| self.resolve_record(lesson))
            .collect()
    }

    fn delete_lesson(&self, id: LessonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM lessons WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "lesson",
                id,
            });
        }
        Ok(())
    }

    fn subject_exists(&self, subject_id: SubjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE uuid = ?1);",
            [subject_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_lesson_row(row: &Row<'_>) -> RepoResult<Lesson> {
    let uuid_text: String = row.get("uuid")?;
    let subject_text: String = row.get("subject_uuid")?;
    let lesson = Lesson {
        uuid: parse_uuid(&uuid_text, "lessons.uuid")?,
        date: row.get("date")?,
        period: row.get("period")?,
        subject_id: parse_uuid(&subject_text, "lessons.subject_uuid")?,
        cycle_day: row.get("cycle_day")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    lesson.validate()?;
    Ok(lesson)
}
