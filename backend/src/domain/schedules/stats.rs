//! Delivery statistics read model.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-practitioner delivery statistics.
///
/// Derived, never stored: each field comes from an independent query, so a
/// momentarily stale count across the numbers is acceptable (read-after-write
/// consistency only, no atomic snapshot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStats {
    /// Count of all schedules owned by the practitioner.
    pub total_schedules: i64,
    /// Count of schedules currently in the active status.
    pub active_schedules: i64,
    /// Count of schedules whose next delivery date is today or later.
    pub upcoming_deliveries: i64,
    /// Count of delivery-log entries marked as sent.
    pub completed_deliveries: i64,
    /// Count of delivery-log entries dated within the current calendar week.
    pub deliveries_this_week: i64,
}

/// Bounds of the calendar week containing `today`, inclusive on both ends.
///
/// Weeks start on Sunday, matching delivery-day index 0.
///
/// # Examples
/// ```
/// use backend::domain::week_bounds;
/// use chrono::NaiveDate;
///
/// let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date");
/// let (start, end) = week_bounds(wednesday);
/// assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"));
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 6).expect("valid date"));
/// ```
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(today.weekday().num_days_from_sunday());
    let start = today - Duration::days(offset);
    (start, start + Duration::days(6))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    #[rstest]
    #[case(date(2024, 1, 7), date(2024, 1, 7), date(2024, 1, 13))] // a Sunday
    #[case(date(2024, 1, 10), date(2024, 1, 7), date(2024, 1, 13))] // mid-week
    #[case(date(2024, 1, 13), date(2024, 1, 7), date(2024, 1, 13))] // a Saturday
    fn week_bounds_are_sunday_through_saturday(
        #[case] today: NaiveDate,
        #[case] expected_start: NaiveDate,
        #[case] expected_end: NaiveDate,
    ) {
        assert_eq!(week_bounds(today), (expected_start, expected_end));
    }

    #[rstest]
    fn week_bounds_span_seven_days() {
        let (start, end) = week_bounds(date(2024, 2, 29));
        assert_eq!((end - start).num_days(), 6);
    }

    #[rstest]
    fn stats_serialise_with_camel_case_keys() {
        let stats = DeliveryStats {
            total_schedules: 4,
            active_schedules: 2,
            upcoming_deliveries: 3,
            completed_deliveries: 10,
            deliveries_this_week: 1,
        };
        let value = serde_json::to_value(stats).expect("stats serialise");
        assert_eq!(value["totalSchedules"], 4);
        assert_eq!(value["deliveriesThisWeek"], 1);
    }
}
