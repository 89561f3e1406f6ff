//! Weekly slot generation.
//!
//! # Algorithm
//!
//! ```text
//! interval = floor(7 / posts_per_week)
//! offset   = 1, 1 + interval, ...   (reduced mod 7 once it reaches 7)
//! hour     = OPTIMAL_HOURS[i % 5]
//! ```
//!
//! Floor division leaves uneven gaps for counts that do not divide 7, and
//! more than 7 posts collapse onto offset 1. Both are kept as-is so slot
//! layout stays deterministic across runs.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::models::TimeSlot;

/// Posting hours cycled through by slot position.
pub const OPTIMAL_HOURS: [u32; 5] = [9, 12, 15, 18, 21];

const DAYS_PER_WEEK: usize = 7;
const FIRST_DAY_OFFSET: usize = 1;

/// Produces exactly `posts_per_week` slots for the week starting at `week_start`.
///
/// Offsets are days after the start date; the time of day on `week_start`
/// is ignored.
///
/// # Example
/// ```
/// use content_planner::scheduler::generate_time_slots;
/// use chrono::{TimeZone, Utc, Weekday};
///
/// let monday = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let slots = generate_time_slots(monday, 3);
///
/// let days: Vec<Weekday> = slots.iter().map(|s| s.day_of_week).collect();
/// assert_eq!(days, vec![Weekday::Tue, Weekday::Thu, Weekday::Sat]);
/// assert_eq!(slots[2].preferred_hour, 15);
/// ```
pub fn generate_time_slots(week_start: DateTime<Utc>, posts_per_week: usize) -> Vec<TimeSlot> {
    if posts_per_week == 0 {
        return Vec::new();
    }

    let day_start = start_of_day(week_start);
    let interval = DAYS_PER_WEEK / posts_per_week;
    let mut offset = FIRST_DAY_OFFSET;

    (0..posts_per_week)
        .map(|i| {
            let hour = OPTIMAL_HOURS[i % OPTIMAL_HOURS.len()];
            let date = day_start + Duration::days(offset as i64) + Duration::hours(i64::from(hour));

            offset += interval;
            if offset >= DAYS_PER_WEEK {
                offset %= DAYS_PER_WEEK;
            }
            TimeSlot::at(date)
        })
        .collect()
}

pub(crate) fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at - Duration::seconds(i64::from(at.num_seconds_from_midnight()))
        - Duration::nanoseconds(i64::from(at.nanosecond()))
}
