//! Instructional cycle resolution and week assembly.
//!
//! # Responsibility
//! - Map calendar dates onto a repeating, weekend-skipping cycle of
//!   `cycle_length` working days split into "Week A"/"Week B" halves.
//! - Join per-day cycle metadata with lesson records into a Monday-Friday
//!   week view.
//!
//! # Invariants
//! - Everything here is pure: no I/O, no logging, no shared state.
//! - An unconfigured cycle (no start date) degrades to cycle day 0 with the
//!   "Not configured" label instead of failing.

pub mod calculator;
pub mod week;

pub use calculator::{
    count_working_days, cycle_day_of, half_label_of, is_working_day, CyclePosition,
    FIRST_HALF_LABEL, SECOND_HALF_LABEL, UNCONFIGURED_LABEL,
};
pub use week::{build_week, week_bounds, weekday_name, DayView, WeekView, SCHOOL_DAYS};
