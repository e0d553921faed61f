//! Monday-Friday week assembly.
//!
//! # Invariants
//! - A week view always holds exactly [`SCHOOL_DAYS`] days, Monday first.
//! - Any requested date snaps back to its own week's Monday, never forward,
//!   except at the edges of the calendar where that week is incomplete.
//! - Lessons outside the window are dropped silently; lessons inside are
//!   passed through unmodified (no de-duplication), sorted by period.
//! - The week is labelled by its Monday even if a cycle half changes
//!   mid-week.

use super::calculator::CyclePosition;
use crate::model::lesson::LessonRecord;
use crate::model::settings::CycleConfig;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHOOL_DAYS: usize = 5;

/// One school day with its cycle metadata and lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    /// 0 = Monday ... 6 = Sunday.
    pub weekday: u32,
    pub weekday_name: &'static str,
    /// `1..=cycle_length`, or 0 when the cycle is not configured.
    pub cycle_day: u32,
    pub is_first_half: bool,
    pub week_label: &'static str,
    /// Lessons on `date`, ascending by period.
    pub lessons: Vec<LessonRecord>,
}

/// Planner view of one school week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Friday of the week.
    pub week_end: NaiveDate,
    /// Label of the Monday.
    pub primary_week_label: &'static str,
    pub periods_per_day: u32,
    pub days: Vec<DayView>,
}

/// Returns the Monday and Friday of the week containing `requested`.
///
/// At the very edges of the calendar the containing Monday or Friday may
/// not exist; the nearest complete school week inside the range is used
/// instead (the following week near the start, the previous week near the
/// end).
pub fn week_bounds(requested: NaiveDate) -> (NaiveDate, NaiveDate) {
    let since_monday = u64::from(requested.weekday().num_days_from_monday());
    let candidates = [
        requested.checked_sub_days(Days::new(since_monday)),
        requested.checked_sub_days(Days::new(since_monday + 7)),
        requested.checked_add_days(Days::new(7 - since_monday)),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|monday| school_week_from(monday).map(|friday| (monday, friday)))
        // Unreachable for chrono's range, which spans many full weeks.
        .unwrap_or((requested, requested))
}

fn school_week_from(monday: NaiveDate) -> Option<NaiveDate> {
    monday.checked_add_days(Days::new(SCHOOL_DAYS as u64 - 1))
}

/// English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Builds the week view for the week containing `requested`.
///
/// `lessons` may be any superset of the week; records outside
/// Monday..=Friday are ignored. The result depends only on the inputs.
pub fn build_week(
    requested: NaiveDate,
    config: &CycleConfig,
    lessons: impl IntoIterator<Item = LessonRecord>,
) -> WeekView {
    let (week_start, week_end) = week_bounds(requested);

    let mut lessons_by_date: BTreeMap<NaiveDate, Vec<LessonRecord>> = BTreeMap::new();
    for record in lessons {
        let date = record.date();
        if date >= week_start && date <= week_end {
            lessons_by_date.entry(date).or_default().push(record);
        }
    }

    let days: Vec<DayView> = week_start
        .iter_days()
        .take(SCHOOL_DAYS)
        .map(|date| {
            let position = CyclePosition::resolve(date, config);
            let mut lessons = lessons_by_date.remove(&date).unwrap_or_default();
            lessons.sort_by_key(LessonRecord::period);
            DayView {
                date,
                weekday: date.weekday().num_days_from_monday(),
                weekday_name: weekday_name(date.weekday()),
                cycle_day: position.cycle_day,
                is_first_half: position.is_first_half,
                week_label: position.week_label,
                lessons,
            }
        })
        .collect();

    let primary_week_label = days
        .first()
        .map_or(CyclePosition::UNCONFIGURED.week_label, |monday| {
            monday.week_label
        });

    WeekView {
        week_start,
        week_end,
        primary_week_label,
        periods_per_day: config.periods_per_day,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::{week_bounds, weekday_name};
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_snaps_back_to_its_own_monday() {
        assert_eq!(
            week_bounds(date(2025, 2, 9)),
            (date(2025, 2, 3), date(2025, 2, 7))
        );
    }

    #[test]
    fn monday_is_its_own_week_start() {
        assert_eq!(week_bounds(date(2025, 2, 3)).0, date(2025, 2, 3));
    }

    #[test]
    fn first_representable_dates_use_the_first_full_week() {
        let (monday, friday) = week_bounds(NaiveDate::MIN);
        assert!(monday >= NaiveDate::MIN);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(friday, monday + Days::new(4));
        assert!(monday.signed_duration_since(NaiveDate::MIN).num_days() < 7);
    }

    #[test]
    fn last_representable_dates_use_the_last_full_week() {
        let (monday, friday) = week_bounds(NaiveDate::MAX);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(friday, monday + Days::new(4));
        assert!(friday <= NaiveDate::MAX);
        assert!(NaiveDate::MAX.signed_duration_since(friday).num_days() < 7);
    }

    #[test]
    fn every_date_in_the_last_fortnight_has_bounds() {
        for back in 0..14 {
            let requested = NaiveDate::MAX - Days::new(back);
            let (monday, friday) = week_bounds(requested);
            assert_eq!(monday.weekday(), Weekday::Mon, "{requested}");
            assert_eq!(friday.weekday(), Weekday::Fri, "{requested}");
        }
    }

    #[test]
    fn weekday_names_are_english() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
