use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::InvalidRangeError;

const TITLE_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Inclusive `[start, stop]` interval over calendar days. `start <= stop`
/// always holds; every constructor goes through [`DateRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    stop: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, stop: NaiveDate) -> Result<Self, InvalidRangeError> {
        if start > stop {
            return Err(InvalidRangeError { start, stop });
        }
        Ok(Self { start, stop })
    }

    /// Drops the time of day from both bounds before validating them.
    pub fn normalize(
        raw_start: NaiveDateTime,
        raw_stop: NaiveDateTime,
    ) -> Result<Self, InvalidRangeError> {
        Self::new(raw_start.date(), raw_stop.date())
    }

    /// First through last day of the month containing `today`.
    pub fn default_for_current_month(today: NaiveDate) -> Self {
        // day 1 exists in every month
        let start = today.with_day(1).unwrap_or(today);
        let stop = start + Months::new(1) - Days::new(1);
        Self { start, stop }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn stop(&self) -> NaiveDate {
        self.stop
    }

    /// Replaces the start bound, keeping the current stop.
    pub fn with_start(&self, start: NaiveDate) -> Result<Self, InvalidRangeError> {
        Self::new(start, self.stop)
    }

    /// Replaces the stop bound, keeping the current start.
    pub fn with_stop(&self, stop: NaiveDate) -> Result<Self, InvalidRangeError> {
        Self::new(self.start, stop)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.stop
    }

    pub fn num_days(&self) -> i64 {
        (self.stop - self.start).num_days() + 1
    }

    /// `M/D/YYYY - M/D/YYYY`, no leading zeros.
    pub fn format(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(TITLE_DATE_FORMAT),
            self.stop.format(TITLE_DATE_FORMAT)
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn normalize_strips_time_of_day() {
        let range = DateRange::normalize(at(2024, 2, 1, 23, 59), at(2024, 2, 29, 0, 1)).unwrap();
        assert_eq!(range.start(), date(2024, 2, 1));
        assert_eq!(range.stop(), date(2024, 2, 29));
    }

    #[test]
    fn normalize_accepts_same_day_with_later_start_time() {
        let range = DateRange::normalize(at(2024, 5, 5, 18, 0), at(2024, 5, 5, 6, 0)).unwrap();
        assert_eq!(range.start(), range.stop());
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn normalize_keeps_valid_pairs_as_whole_days() {
        let cases = [
            (
                at(2023, 12, 31, 23, 59),
                at(2024, 1, 1, 0, 0),
                date(2023, 12, 31),
                date(2024, 1, 1),
            ),
            (
                at(2024, 1, 1, 0, 0),
                at(2024, 1, 1, 0, 0),
                date(2024, 1, 1),
                date(2024, 1, 1),
            ),
            (
                at(2023, 2, 28, 12, 0),
                at(2024, 2, 29, 12, 0),
                date(2023, 2, 28),
                date(2024, 2, 29),
            ),
            (
                at(1999, 12, 31, 0, 0),
                at(2000, 3, 1, 23, 59),
                date(1999, 12, 31),
                date(2000, 3, 1),
            ),
        ];
        for (raw_start, raw_stop, start, stop) in cases {
            let range = DateRange::normalize(raw_start, raw_stop).unwrap();
            assert_eq!(range.start(), start, "{raw_start} - {raw_stop}");
            assert_eq!(range.stop(), stop, "{raw_start} - {raw_stop}");
        }
    }

    #[test]
    fn normalize_rejects_start_after_stop() {
        let err = DateRange::normalize(at(2024, 3, 1, 0, 0), at(2024, 2, 28, 12, 0)).unwrap_err();
        assert_eq!(err.start, date(2024, 3, 1));
        assert_eq!(err.stop, date(2024, 2, 28));
    }

    #[test]
    fn month_defaults_follow_calendar() {
        let cases = [
            (date(2023, 2, 14), date(2023, 2, 28)),
            (date(2024, 2, 10), date(2024, 2, 29)),
            (date(1900, 2, 1), date(1900, 2, 28)),
            (date(2000, 2, 29), date(2000, 2, 29)),
            (date(2024, 4, 30), date(2024, 4, 30)),
            (date(2024, 9, 3), date(2024, 9, 30)),
            (date(2024, 1, 31), date(2024, 1, 31)),
            (date(2024, 12, 25), date(2024, 12, 31)),
        ];
        for (today, last) in cases {
            let range = DateRange::default_for_current_month(today);
            assert_eq!(range.start(), date(today.year(), today.month(), 1), "{today}");
            assert_eq!(range.stop(), last, "{today}");
        }
    }

    #[test]
    fn single_bound_edits_are_validated() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        assert_eq!(
            range.with_start(date(2024, 2, 15)).unwrap().start(),
            date(2024, 2, 15)
        );
        assert!(range.with_start(date(2024, 3, 1)).is_err());
        assert!(range.with_stop(date(2024, 1, 31)).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        assert!(range.contains(date(2024, 2, 1)));
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 3, 1)));
    }

    #[test]
    fn format_has_no_leading_zeros() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(range.format(), "2/1/2024 - 12/31/2024");
        assert_eq!(range.to_string(), range.format());
    }
}
