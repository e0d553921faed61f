use chrono::NaiveDate;
use planner_core::cycle::SCHOOL_DAYS;
use planner_core::{build_week, CycleConfig, Lesson, LessonRecord};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(day: NaiveDate, period: u32) -> LessonRecord {
    let mut lesson = Lesson::new(day, period, Uuid::new_v4());
    lesson.title = Some(format!("{day} p{period}"));
    LessonRecord::bare(lesson)
}

fn configured() -> CycleConfig {
    CycleConfig {
        periods_per_day: 5,
        ..CycleConfig::starting(date(2025, 1, 27), 10)
    }
}

#[test]
fn every_requested_weekday_yields_the_same_monday_to_friday_week() {
    let config = configured();
    for day in 3..=9 {
        let week = build_week(date(2025, 2, day), &config, Vec::new());
        assert_eq!(week.week_start, date(2025, 2, 3));
        assert_eq!(week.week_end, date(2025, 2, 7));
        assert_eq!(week.days.len(), SCHOOL_DAYS);

        let names: Vec<&str> = week.days.iter().map(|d| d.weekday_name).collect();
        assert_eq!(names, ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
        let weekdays: Vec<u32> = week.days.iter().map(|d| d.weekday).collect();
        assert_eq!(weekdays, [0, 1, 2, 3, 4]);
    }
}

#[test]
fn wednesday_request_resolves_to_surrounding_monday_and_friday() {
    let week = build_week(date(2025, 2, 5), &configured(), Vec::new());
    assert_eq!(week.week_start, date(2025, 2, 3));
    assert_eq!(week.week_end, date(2025, 2, 7));
}

#[test]
fn days_carry_cycle_metadata_and_week_takes_monday_label() {
    let week = build_week(date(2025, 2, 3), &configured(), Vec::new());

    let cycle_days: Vec<u32> = week.days.iter().map(|d| d.cycle_day).collect();
    assert_eq!(cycle_days, [6, 7, 8, 9, 10]);
    assert!(week.days.iter().all(|d| d.week_label == "Week B"));
    assert_eq!(week.primary_week_label, "Week B");
    assert_eq!(week.periods_per_day, 5);
}

#[test]
fn week_label_follows_monday_when_half_changes_mid_week() {
    // Six-day cycle: Monday 2025-02-03 is day 6, Tuesday wraps to day 1.
    let config = CycleConfig::starting(date(2025, 1, 27), 6);
    let week = build_week(date(2025, 2, 3), &config, Vec::new());

    assert_eq!(week.days[0].cycle_day, 6);
    assert_eq!(week.days[0].week_label, "Week B");
    assert_eq!(week.days[1].cycle_day, 1);
    assert_eq!(week.days[1].week_label, "Week A");
    assert_eq!(week.primary_week_label, "Week B");
}

#[test]
fn unconfigured_cycle_labels_every_day_not_configured() {
    let week = build_week(date(2025, 2, 5), &CycleConfig::default(), Vec::new());
    assert_eq!(week.primary_week_label, "Not configured");
    for day in &week.days {
        assert_eq!(day.cycle_day, 0);
        assert!(day.is_first_half);
        assert_eq!(day.week_label, "Not configured");
    }
    assert_eq!(week.periods_per_day, 6);
}

#[test]
fn lessons_are_grouped_by_date_sorted_by_period_and_filtered_to_the_week() {
    let lessons = vec![
        record(date(2025, 2, 4), 3),
        record(date(2025, 2, 4), 1),
        record(date(2025, 2, 7), 2),
        record(date(2025, 2, 2), 1),
        record(date(2025, 2, 8), 1),
        record(date(2025, 2, 10), 1),
    ];

    let week = build_week(date(2025, 2, 3), &configured(), lessons);

    assert!(week.days[0].lessons.is_empty());
    let tuesday: Vec<u32> = week.days[1].lessons.iter().map(|l| l.period()).collect();
    assert_eq!(tuesday, [1, 3]);
    assert_eq!(week.days[4].lessons.len(), 1);
    let total: usize = week.days.iter().map(|d| d.lessons.len()).sum();
    assert_eq!(total, 3);
}

#[test]
fn duplicate_slots_are_passed_through_unchanged() {
    let first = record(date(2025, 2, 5), 2);
    let second = record(date(2025, 2, 5), 2);
    let ids = [first.lesson.uuid, second.lesson.uuid];

    let week = build_week(date(2025, 2, 5), &configured(), vec![first, second]);

    let wednesday = &week.days[2].lessons;
    assert_eq!(wednesday.len(), 2);
    assert_eq!([wednesday[0].lesson.uuid, wednesday[1].lesson.uuid], ids);
}

#[test]
fn weeks_at_the_edges_of_the_calendar_still_have_five_school_days() {
    let config = configured();
    for requested in [NaiveDate::MIN, NaiveDate::MAX] {
        let week = build_week(requested, &config, vec![record(requested, 1)]);

        assert_eq!(week.days.len(), SCHOOL_DAYS, "{requested}");
        assert_eq!(week.days[0].date, week.week_start);
        assert_eq!(week.days[4].date, week.week_end);
        assert_eq!(week.days[0].weekday_name, "Monday");
        assert_eq!(week.days[4].weekday_name, "Friday");
        assert!(week
            .days
            .iter()
            .all(|day| (1..=10).contains(&day.cycle_day)));
    }
}

#[test]
fn building_twice_gives_identical_views() {
    let lessons = vec![record(date(2025, 2, 4), 2), record(date(2025, 2, 6), 1)];
    let config = configured();

    let first = build_week(date(2025, 2, 6), &config, lessons.clone());
    let second = build_week(date(2025, 2, 6), &config, lessons);
    assert_eq!(first, second);
}

#[test]
fn week_view_serializes_with_iso_dates() {
    let week = build_week(date(2025, 2, 5), &configured(), vec![record(date(2025, 2, 5), 1)]);
    let value = serde_json::to_value(&week).unwrap();

    assert_eq!(value["week_start"], "2025-02-03");
    assert_eq!(value["week_end"], "2025-02-07");
    assert_eq!(value["primary_week_label"], "Week B");
    assert_eq!(value["days"][2]["weekday_name"], "Wednesday");
    assert_eq!(value["days"][2]["lessons"][0]["period"], 1);
}
