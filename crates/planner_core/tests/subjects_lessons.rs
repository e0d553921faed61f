use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::{
    CycleConfig, LessonItemService, LessonService, LessonServiceError, LessonUpdate, NewLesson,
    NewNote, NewTodo, SqliteLessonItemRepository, SqliteLessonRepository, SqliteSubjectRepository,
    Subject, SubjectListQuery, SubjectService, SubjectServiceError, SubjectUpdate,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_subject(conn: &Connection, name: &str) -> Subject {
    let repo = SqliteSubjectRepository::try_new(conn).unwrap();
    let service = SubjectService::new(repo);
    service.create_subject(&Subject::new(name, 2025, 1)).unwrap()
}

fn new_lesson(day: NaiveDate, period: u32, subject: &Subject) -> NewLesson {
    NewLesson {
        date: day,
        period,
        subject_id: subject.uuid,
        cycle_day: None,
        title: None,
    }
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn subject_create_update_and_filtered_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubjectRepository::try_new(&conn).unwrap();
    let service = SubjectService::new(repo);

    let mut history = Subject::new("Modern History", 2025, 1);
    history.year_level = Some(11);
    history.colour = Some("#3B82F6".to_string());
    let history = service.create_subject(&history).unwrap();
    assert!(history.created_at > 0);

    let mut chemistry = Subject::new("chemistry", 2025, 1);
    chemistry.year_level = Some(10);
    service.create_subject(&chemistry).unwrap();
    service
        .create_subject(&Subject::new("Homeroom", 2025, 1))
        .unwrap();
    service
        .create_subject(&Subject::new("Biology", 2025, 2))
        .unwrap();

    let term_one = service
        .list_subjects(&SubjectListQuery {
            academic_year: Some(2025),
            semester: Some(1),
            ..SubjectListQuery::default()
        })
        .unwrap();
    let names: Vec<&str> = term_one.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["chemistry", "Modern History", "Homeroom"]);

    let updated = service
        .update_subject(
            history.uuid,
            SubjectUpdate {
                room: Some(Some("B12".to_string())),
                colour: Some(None),
                is_active: Some(false),
                ..SubjectUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.room.as_deref(), Some("B12"));
    assert_eq!(updated.colour, None);
    assert!(!updated.is_active);

    let active = service
        .list_subjects(&SubjectListQuery {
            is_active: Some(true),
            ..SubjectListQuery::default()
        })
        .unwrap();
    assert!(active.iter().all(|s| s.uuid != history.uuid));
    assert_eq!(active.len(), 3);
}

#[test]
fn subject_with_invalid_colour_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubjectRepository::try_new(&conn).unwrap();
    let service = SubjectService::new(repo);

    let mut subject = Subject::new("Art", 2025, 1);
    subject.colour = Some("teal".to_string());
    let err = service.create_subject(&subject).unwrap_err();
    assert!(matches!(err, SubjectServiceError::InvalidSubject(_)));
    assert_eq!(count_rows(&conn, "subjects"), 0);
}

#[test]
fn missing_subject_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubjectRepository::try_new(&conn).unwrap();
    let service = SubjectService::new(repo);
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.get_subject(missing),
        Err(SubjectServiceError::SubjectNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_subject(missing),
        Err(SubjectServiceError::SubjectNotFound(_))
    ));
}

#[test]
fn create_lesson_stamps_cycle_day_from_config() {
    let conn = open_db_in_memory().unwrap();
    let subject = create_subject(&conn, "Physics");
    let repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let service = LessonService::new(repo);
    let config = CycleConfig::starting(date(2025, 1, 27), 10);

    let record = service
        .create_lesson(new_lesson(date(2025, 2, 3), 2, &subject), &config)
        .unwrap();
    assert_eq!(record.lesson.cycle_day, Some(6));
    assert_eq!(record.subject.as_ref().map(|s| s.uuid), Some(subject.uuid));
    assert!(record.notes.is_empty() && record.resources.is_empty() && record.todos.is_empty());

    let manual = service
        .create_lesson(
            NewLesson {
                cycle_day: Some(3),
                title: Some("Lab".to_string()),
                ..new_lesson(date(2025, 2, 3), 3, &subject)
            },
            &config,
        )
        .unwrap();
    assert_eq!(manual.lesson.cycle_day, Some(3));
    assert_eq!(manual.lesson.title.as_deref(), Some("Lab"));

    let unconfigured = service
        .create_lesson(
            new_lesson(date(2025, 2, 4), 1, &subject),
            &CycleConfig::default(),
        )
        .unwrap();
    assert_eq!(unconfigured.lesson.cycle_day, None);
}

#[test]
fn create_lesson_rejects_unknown_subject_and_taken_slot() {
    let conn = open_db_in_memory().unwrap();
    let subject = create_subject(&conn, "Maths");
    let repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let service = LessonService::new(repo);
    let config = CycleConfig::default();

    let ghost = Subject::new("Ghost", 2025, 1);
    let err = service
        .create_lesson(new_lesson(date(2025, 2, 3), 1, &ghost), &config)
        .unwrap_err();
    assert!(matches!(err, LessonServiceError::SubjectNotFound(id) if id == ghost.uuid));

    service
        .create_lesson(new_lesson(date(2025, 2, 3), 1, &subject), &config)
        .unwrap();
    let err = service
        .create_lesson(new_lesson(date(2025, 2, 3), 1, &subject), &config)
        .unwrap_err();
    match err {
        LessonServiceError::SlotTaken { date: day, period } => {
            assert_eq!(day, date(2025, 2, 3));
            assert_eq!(period, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count_rows(&conn, "lessons"), 1);
}

#[test]
fn update_lesson_moves_slot_and_rejects_collisions() {
    let conn = open_db_in_memory().unwrap();
    let subject = create_subject(&conn, "English");
    let other_subject = create_subject(&conn, "Drama");
    let repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let service = LessonService::new(repo);
    let config = CycleConfig::default();

    let first = service
        .create_lesson(new_lesson(date(2025, 2, 3), 1, &subject), &config)
        .unwrap();
    service
        .create_lesson(new_lesson(date(2025, 2, 3), 2, &subject), &config)
        .unwrap();

    let err = service
        .update_lesson(
            first.lesson.uuid,
            LessonUpdate {
                period: Some(2),
                ..LessonUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LessonServiceError::SlotTaken { period: 2, .. }));

    let same_slot = service
        .update_lesson(
            first.lesson.uuid,
            LessonUpdate {
                period: Some(1),
                title: Some(Some("Poetry".to_string())),
                ..LessonUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(same_slot.lesson.title.as_deref(), Some("Poetry"));

    let moved = service
        .update_lesson(
            first.lesson.uuid,
            LessonUpdate {
                date: Some(date(2025, 2, 4)),
                subject_id: Some(other_subject.uuid),
                ..LessonUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(moved.lesson.date, date(2025, 2, 4));
    assert_eq!(moved.subject.map(|s| s.name), Some("Drama".to_string()));

    let err = service
        .update_lesson(Uuid::new_v4(), LessonUpdate::default())
        .unwrap_err();
    assert!(matches!(err, LessonServiceError::LessonNotFound(_)));
}

#[test]
fn deleting_subject_cascades_to_lessons_and_items() {
    let conn = open_db_in_memory().unwrap();
    let subject = create_subject(&conn, "Geography");
    let lesson_repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let lessons = LessonService::new(lesson_repo);
    let item_repo = SqliteLessonItemRepository::try_new(&conn).unwrap();
    let items = LessonItemService::new(item_repo);

    let record = lessons
        .create_lesson(
            new_lesson(date(2025, 2, 5), 4, &subject),
            &CycleConfig::default(),
        )
        .unwrap();
    items
        .add_note(
            record.lesson.uuid,
            NewNote {
                title: None,
                content: "Bring atlases".to_string(),
            },
        )
        .unwrap();
    items
        .add_todo(
            record.lesson.uuid,
            NewTodo {
                content: "Print maps".to_string(),
                is_completed: false,
                priority: Some(1),
                due_date: None,
            },
        )
        .unwrap();

    let subject_repo = SqliteSubjectRepository::try_new(&conn).unwrap();
    SubjectService::new(subject_repo)
        .delete_subject(subject.uuid)
        .unwrap();

    assert_eq!(count_rows(&conn, "lessons"), 0);
    assert_eq!(count_rows(&conn, "notes"), 0);
    assert_eq!(count_rows(&conn, "todos"), 0);
    assert!(matches!(
        lessons.get_lesson(record.lesson.uuid),
        Err(LessonServiceError::LessonNotFound(_))
    ));
}

#[test]
fn week_view_reads_lessons_for_the_requested_week() {
    let conn = open_db_in_memory().unwrap();
    let subject = create_subject(&conn, "Music");
    let repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let service = LessonService::new(repo);
    let config = CycleConfig::starting(date(2025, 1, 27), 10);

    for (day, period) in [
        (date(2025, 2, 5), 3),
        (date(2025, 2, 5), 1),
        (date(2025, 2, 7), 6),
        (date(2025, 2, 10), 1),
        (date(2025, 1, 31), 1),
    ] {
        service
            .create_lesson(new_lesson(day, period, &subject), &config)
            .unwrap();
    }

    let week = service.week_view(date(2025, 2, 5), &config).unwrap();
    assert_eq!(week.week_start, date(2025, 2, 3));
    assert_eq!(week.week_end, date(2025, 2, 7));
    assert_eq!(week.primary_week_label, "Week B");

    let wednesday: Vec<u32> = week.days[2].lessons.iter().map(|l| l.period()).collect();
    assert_eq!(wednesday, [1, 3]);
    assert_eq!(week.days[4].lessons.len(), 1);
    let total: usize = week.days.iter().map(|d| d.lessons.len()).sum();
    assert_eq!(total, 3);
    assert!(week.days[2].lessons[0].subject.is_some());

    let listed = service
        .list_lessons(date(2025, 1, 27), date(2025, 2, 14))
        .unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0].date(), date(2025, 1, 31));

    let reversed = service
        .list_lessons(date(2025, 2, 14), date(2025, 1, 27))
        .unwrap();
    assert_eq!(reversed, listed);

    let single_day: Vec<u32> = service
        .list_lessons(date(2025, 2, 5), date(2025, 2, 5))
        .unwrap()
        .iter()
        .map(|l| l.period())
        .collect();
    assert_eq!(single_day, [1, 3]);
}

#[test]
fn cycle_day_resolves_single_dates_with_fallback() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLessonRepository::try_new(&conn).unwrap();
    let service = LessonService::new(repo);

    let configured = CycleConfig::starting(date(2025, 1, 27), 10);
    let position = service.cycle_day(date(2025, 2, 3), &configured);
    assert_eq!(position.cycle_day, 6);
    assert_eq!(position.week_label, "Week B");

    let before_anchor = service.cycle_day(date(2025, 1, 24), &configured);
    assert_eq!(before_anchor.cycle_day, 10);

    let unconfigured = service.cycle_day(date(2025, 2, 3), &CycleConfig::default());
    assert_eq!(unconfigured.cycle_day, 0);
    assert_eq!(unconfigured.week_label, "Not configured");
}
