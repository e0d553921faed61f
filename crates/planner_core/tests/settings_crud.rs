use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::{
    SettingsService, SettingsServiceError, SettingsUpdate, SqliteSettingsRepository,
    ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn get_or_create_inserts_defaults_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    let first = service.get_or_create().unwrap();
    assert_eq!(first.periods_per_day, 6);
    assert_eq!(first.current_year, 2025);
    assert_eq!(first.current_semester, 1);
    assert_eq!(first.cycle_length, 10);
    assert_eq!(first.cycle_start_date, None);
    assert!(first.updated_at > 0);

    let second = service.get_or_create().unwrap();
    assert_eq!(first, second);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM settings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn update_persists_cycle_anchor_and_can_clear_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    let updated = service
        .update(SettingsUpdate {
            cycle_length: Some(8),
            cycle_start_date: Some(Some(date(2025, 1, 27))),
            current_semester: Some(2),
            ..SettingsUpdate::default()
        })
        .unwrap();
    assert_eq!(updated.cycle_length, 8);
    assert_eq!(updated.current_semester, 2);
    assert_eq!(updated.cycle_start_date, Some(date(2025, 1, 27)));

    let config = service.cycle_config().unwrap();
    assert!(config.is_configured());
    assert_eq!(config.cycle_length, 8);
    assert_eq!(config.periods_per_day, 6);

    let cleared = service
        .update(SettingsUpdate {
            cycle_start_date: Some(None),
            ..SettingsUpdate::default()
        })
        .unwrap();
    assert_eq!(cleared.cycle_start_date, None);
    assert_eq!(cleared.cycle_length, 8);
    assert!(!service.cycle_config().unwrap().is_configured());
}

#[test]
fn anchor_date_is_stored_as_iso_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    service
        .update(SettingsUpdate {
            cycle_start_date: Some(Some(date(2025, 1, 27))),
            ..SettingsUpdate::default()
        })
        .unwrap();

    let stored: String = conn
        .query_row("SELECT cycle_start_date FROM settings WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "2025-01-27");
}

#[test]
fn set_periods_per_day_accepts_bounds_and_rejects_outside() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    assert_eq!(service.set_periods_per_day(1).unwrap().periods_per_day, 1);
    assert_eq!(service.set_periods_per_day(12).unwrap().periods_per_day, 12);

    for invalid in [0, 13] {
        let err = service.set_periods_per_day(invalid).unwrap_err();
        match err {
            SettingsServiceError::InvalidSettings(ValidationError::OutOfRange {
                field, value, ..
            }) => {
                assert_eq!(field, "periods_per_day");
                assert_eq!(value, i64::from(invalid));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(service.get_or_create().unwrap().periods_per_day, 12);
}

#[test]
fn zero_cycle_length_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    let err = service
        .update(SettingsUpdate {
            cycle_length: Some(0),
            ..SettingsUpdate::default()
        })
        .unwrap_err();
    assert!(matches!(err, SettingsServiceError::InvalidSettings(_)));
    assert_eq!(service.get_or_create().unwrap().cycle_length, 10);
}

#[test]
fn empty_update_returns_current_settings() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    let service = SettingsService::new(repo);

    let current = service.get_or_create().unwrap();
    assert_eq!(service.update(SettingsUpdate::default()).unwrap(), current);
}
