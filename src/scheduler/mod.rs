//! Weekly slot assignment and calendar building.
//!
//! Generates the week's slots, assigns threads with a greedy primary pass
//! plus a constraint-relaxed fallback pass, and folds the result into a
//! [`ContentCalendar`](crate::models::ContentCalendar).
//!
//! # Algorithm
//!
//! `ContentScheduler` is a greedy, single-pass-per-slot heuristic. It does
//! not backtrack and does not guarantee feasibility: slots that neither
//! pass can fill are reported, not treated as errors.
//!
//! # Calendar
//!
//! `build_calendar` computes distribution, coverage, quality and
//! diversity metadata for reporting.

mod calendar;
mod greedy;
mod slots;

pub use calendar::{build_calendar, get_next_week_start, get_next_week_start_from_now};
pub use greedy::{
    ContentScheduler, ScheduleOutcome, UsageLedger, SOFT_SCORE_WEIGHT, THREAD_SCORE_WEIGHT,
};
pub use slots::{generate_time_slots, OPTIMAL_HOURS};
