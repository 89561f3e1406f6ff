//! Time slot model.
//!
//! A slot is one bookable (date, hour) position in the week. Slots are
//! generated fresh for every scheduling run and hold at most one thread.
//!
//! # Time Model
//! All instants are UTC. `date` already carries the preferred hour, so
//! slot-to-slot distance is a plain timestamp difference.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A bookable position in the weekly calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Slot start (date at `preferred_hour`:00 UTC).
    pub date: DateTime<Utc>,
    /// Weekday of `date`.
    pub day_of_week: Weekday,
    /// Posting hour (0-23).
    pub preferred_hour: u32,
}

impl TimeSlot {
    /// Creates a slot starting at `date`; weekday and hour are derived from it.
    pub fn at(date: DateTime<Utc>) -> Self {
        Self {
            date,
            day_of_week: date.weekday(),
            preferred_hour: date.hour(),
        }
    }

    /// Absolute distance between this slot and an instant.
    pub fn distance_to(&self, other: DateTime<Utc>) -> Duration {
        let delta = self.date - other;
        if delta < Duration::zero() {
            -delta
        } else {
            delta
        }
    }

    /// Whether `other` lies strictly within `window` of this slot, in either direction.
    pub fn is_within(&self, other: DateTime<Utc>, window: Duration) -> bool {
        self.distance_to(other) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slot_derives_weekday_and_hour() {
        let slot = TimeSlot::at(Utc.with_ymd_and_hms(2025, 1, 7, 9, 0, 0).unwrap());
        assert_eq!(slot.day_of_week, Weekday::Tue);
        assert_eq!(slot.preferred_hour, 9);
    }

    #[test]
    fn test_is_within_symmetric_and_exclusive() {
        let slot = TimeSlot::at(Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap());
        let window = Duration::hours(48);

        let before = Utc.with_ymd_and_hms(2025, 1, 7, 12, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 1, 9, 12, 0, 0).unwrap();
        let exactly = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();

        assert!(slot.is_within(before, window));
        assert!(slot.is_within(after, window));
        assert!(!slot.is_within(exactly, window)); // exactly 48h apart is allowed
    }

    #[test]
    fn test_slot_json_shape() {
        let slot = TimeSlot::at(Utc.with_ymd_and_hms(2025, 1, 7, 9, 0, 0).unwrap());
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["preferredHour"], 9);
        assert!(json.get("dayOfWeek").is_some());
    }
}
