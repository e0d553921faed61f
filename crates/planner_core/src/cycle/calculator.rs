//! Cycle-day arithmetic.
//!
//! A cycle advances one step per working day (Monday-Friday) starting at
//! day 1 on `cycle_start_date`. Dates before the anchor wrap backwards into
//! the previous cycle, so every date resolves to `1..=cycle_length`.

use crate::model::settings::CycleConfig;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

pub const FIRST_HALF_LABEL: &str = "Week A";
pub const SECOND_HALF_LABEL: &str = "Week B";
pub const UNCONFIGURED_LABEL: &str = "Not configured";

/// Returns whether `date` falls on Monday-Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts working days after `start` up to and including `end`.
///
/// `start` itself is never counted. The result is antisymmetric:
/// `count_working_days(a, b) == -count_working_days(b, a)`, and zero when
/// both dates are equal.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -count_working_days(end, start);
    }

    // Any 7 consecutive days hold exactly 5 working days, so only the
    // leftover days after `start` need walking.
    let span = end.signed_duration_since(start).num_days();
    let full_weeks = span / 7;
    let leftover = usize::try_from(span % 7).unwrap_or(0);
    let leftover_working = start
        .iter_days()
        .skip(1)
        .take(leftover)
        .filter(|day| is_working_day(*day))
        .count();
    full_weeks * 5 + i64::try_from(leftover_working).unwrap_or(0)
}

/// Resolves the 1-based cycle day of `target`.
///
/// Returns `None` when `config` has no `cycle_start_date`; callers decide
/// how to present the unconfigured state (see [`CyclePosition::resolve`]).
/// A zero `cycle_length` is treated as 1.
pub fn cycle_day_of(target: NaiveDate, config: &CycleConfig) -> Option<u32> {
    let start = config.cycle_start_date?;
    let length = i64::from(config.cycle_length.max(1));
    let offset = count_working_days(start, target).rem_euclid(length);
    // offset < length <= u32::MAX
    Some(u32::try_from(offset).unwrap_or(0) + 1)
}

/// Splits the cycle into two contiguous halves.
///
/// Days `1..=cycle_length / 2` are the first half ("Week A"); the rest are
/// the second half ("Week B"). Returns `(is_first_half, label)`.
pub fn half_label_of(cycle_day: u32, cycle_length: u32) -> (bool, &'static str) {
    let midpoint = cycle_length / 2;
    let is_first_half = cycle_day <= midpoint;
    let label = if is_first_half {
        FIRST_HALF_LABEL
    } else {
        SECOND_HALF_LABEL
    };
    (is_first_half, label)
}

/// Cycle metadata for one date, including the unconfigured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CyclePosition {
    /// `1..=cycle_length`, or 0 when the cycle is not configured.
    pub cycle_day: u32,
    pub is_first_half: bool,
    pub week_label: &'static str,
}

impl CyclePosition {
    /// Sentinel used when no cycle start date is configured.
    pub const UNCONFIGURED: Self = Self {
        cycle_day: 0,
        is_first_half: true,
        week_label: UNCONFIGURED_LABEL,
    };

    /// Resolves `date` against `config`, falling back to
    /// [`CyclePosition::UNCONFIGURED`] when no anchor date is set.
    pub fn resolve(date: NaiveDate, config: &CycleConfig) -> Self {
        match cycle_day_of(date, config) {
            Some(cycle_day) => {
                let (is_first_half, week_label) = half_label_of(cycle_day, config.cycle_length);
                Self {
                    cycle_day,
                    is_first_half,
                    week_label,
                }
            }
            None => Self::UNCONFIGURED,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.cycle_day != 0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        count_working_days, cycle_day_of, half_label_of, is_working_day, CyclePosition,
    };
    use crate::model::settings::CycleConfig;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekends_are_not_working_days() {
        assert!(is_working_day(date(2025, 1, 31)));
        assert!(!is_working_day(date(2025, 2, 1)));
        assert!(!is_working_day(date(2025, 2, 2)));
    }

    #[test]
    fn one_week_later_counts_five_working_days() {
        assert_eq!(count_working_days(date(2025, 1, 27), date(2025, 2, 3)), 5);
    }

    #[test]
    fn weekend_start_is_not_counted() {
        // Saturday -> Monday: only the Monday counts.
        assert_eq!(count_working_days(date(2025, 2, 1), date(2025, 2, 3)), 1);
        // Friday -> Sunday: nothing after Friday is a working day.
        assert_eq!(count_working_days(date(2025, 1, 31), date(2025, 2, 2)), 0);
    }

    #[test]
    fn long_spans_match_a_day_by_day_walk() {
        let start = date(2024, 12, 20);
        for span in [0u64, 1, 6, 7, 13, 365, 1000] {
            let end = start + chrono::Days::new(span);
            let walked = start
                .iter_days()
                .skip(1)
                .take_while(|day| *day <= end)
                .filter(|day| is_working_day(*day))
                .count() as i64;
            assert_eq!(count_working_days(start, end), walked, "span {span}");
        }
    }

    #[test]
    fn counting_across_the_whole_date_range_does_not_overflow() {
        let forward = count_working_days(NaiveDate::MIN, NaiveDate::MAX);
        assert!(forward > 0);
        assert_eq!(count_working_days(NaiveDate::MAX, NaiveDate::MIN), -forward);
    }

    #[test]
    fn dates_before_start_wrap_into_previous_cycle() {
        let config = CycleConfig::starting(date(2025, 1, 27), 10);
        // Friday before the anchor Monday is the last day of the prior cycle.
        assert_eq!(cycle_day_of(date(2025, 1, 24), &config), Some(10));
        assert_eq!(cycle_day_of(date(2025, 1, 20), &config), Some(6));
    }

    #[test]
    fn unconfigured_cycle_has_no_day() {
        assert_eq!(cycle_day_of(date(2025, 2, 3), &CycleConfig::default()), None);
        assert_eq!(
            CyclePosition::resolve(date(2025, 2, 3), &CycleConfig::default()),
            CyclePosition::UNCONFIGURED
        );
    }

    #[test]
    fn odd_cycle_length_puts_midpoint_day_in_first_half() {
        assert_eq!(half_label_of(3, 7), (true, "Week A"));
        assert_eq!(half_label_of(4, 7), (false, "Week B"));
    }

    #[test]
    fn single_day_cycle_is_always_second_half() {
        let config = CycleConfig::starting(date(2025, 1, 27), 1);
        let position = CyclePosition::resolve(date(2025, 3, 12), &config);
        assert_eq!(position.cycle_day, 1);
        assert!(!position.is_first_half);
        assert_eq!(position.week_label, "Week B");
    }

    #[test]
    fn zero_length_is_treated_as_one() {
        let config = CycleConfig::starting(date(2025, 1, 27), 0);
        assert_eq!(cycle_day_of(date(2025, 2, 5), &config), Some(1));
    }
}
