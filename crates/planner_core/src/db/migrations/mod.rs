//! Planner schema registry.
//!
//! Each step is a named SQL script under this directory together with the
//! tables it introduces. `PRAGMA user_version` records the last applied
//! step; a store opened at any version ends up with every planner table
//! present or the open fails.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    tables: &'static [&'static str],
    sql: &'static str,
}

/// Ordered by `version`, starting at 1 with no gaps.
const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "timetable",
        tables: &["settings", "subjects", "lessons"],
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "lesson_items",
        tables: &["notes", "resources", "todos"],
        sql: include_str!("0002_lesson_items.sql"),
    },
];

/// Schema version written by the newest step this build knows.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Every table the planner schema defines, in creation order.
pub fn planner_tables() -> impl Iterator<Item = &'static str> {
    SCHEMA_STEPS
        .iter()
        .flat_map(|step| step.tables.iter().copied())
}

/// Reads the schema version stored in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings the store up to [`latest_version`] and checks the result.
///
/// Pending steps run in one transaction. A store written by a newer build
/// is rejected untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = schema_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    if stored < latest {
        let tx = conn.transaction()?;
        for step in SCHEMA_STEPS.iter().filter(|step| step.version > stored) {
            run_step(&tx, step)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from_version={stored} to_version={latest}");
    }

    verify_tables(conn, latest)
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    info!(
        "event=db_migrate_step module=db status=ok version={} name={} tables={}",
        step.version,
        step.name,
        step.tables.join(",")
    );
    Ok(())
}

fn verify_tables(conn: &Connection, version: u32) -> DbResult<()> {
    for table in planner_tables() {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingTable {
                table,
                schema_version: version,
            });
        }
    }
    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )
}
