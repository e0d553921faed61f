//! Settings repository (single-row table).
//!
//! # Invariants
//! - The row always has `id = 1`; saves are upserts.

use super::{ensure_tables, RepoResult};
use crate::model::settings::Settings;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for the settings singleton.
pub trait SettingsRepository {
    /// Loads the settings row, or `None` on a fresh database.
    fn load_settings(&self) -> RepoResult<Option<Settings>>;
    /// Inserts or replaces the settings row.
    fn save_settings(&self, settings: &Settings) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["settings"])?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> RepoResult<Option<Settings>> {
        let settings = self
            .conn
            .query_row(
                "SELECT
                    periods_per_day,
                    current_year,
                    current_semester,
                    cycle_length,
                    cycle_start_date,
                    updated_at
                 FROM settings
                 WHERE id = 1;",
                [],
                |row| {
                    Ok(Settings {
                        periods_per_day: row.get("periods_per_day")?,
                        current_year: row.get("current_year")?,
                        current_semester: row.get("current_semester")?,
                        cycle_length: row.get("cycle_length")?,
                        cycle_start_date: row.get("cycle_start_date")?,
                        updated_at: row.get("updated_at")?,
                    })
                },
            )
            .optional()?;

        if let Some(settings) = settings.as_ref() {
            settings.validate()?;
        }
        Ok(settings)
    }

    fn save_settings(&self, settings: &Settings) -> RepoResult<()> {
        settings.validate()?;

        self.conn.execute(
            "INSERT INTO settings (
                id,
                periods_per_day,
                current_year,
                current_semester,
                cycle_length,
                cycle_start_date
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                periods_per_day = excluded.periods_per_day,
                current_year = excluded.current_year,
                current_semester = excluded.current_semester,
                cycle_length = excluded.cycle_length,
                cycle_start_date = excluded.cycle_start_date,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                settings.periods_per_day,
                settings.current_year,
                settings.current_semester,
                settings.cycle_length,
                settings.cycle_start_date,
            ],
        )?;
        Ok(())
    }
}
