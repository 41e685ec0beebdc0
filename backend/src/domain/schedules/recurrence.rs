//! Recurrence rule types and the next-delivery-date calculator.
//!
//! The calculator is a pure date function: it never reads the clock or the
//! database. Callers advancing a schedule after a delivery pass the day
//! *after* the last delivery as the reference date; the calculator itself is
//! inclusive of the reference date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ScheduleValidationError;

/// Recurrence class governing how the next delivery date is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl DeliveryFrequency {
    /// Whether this frequency requires an explicit set of delivery weekdays.
    pub fn requires_delivery_days(self) -> bool {
        matches!(self, Self::Weekly | Self::BiWeekly)
    }

    /// Human-readable label shown by UI layers.
    ///
    /// Owned here so views never re-implement the mapping.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Every two weeks",
            Self::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for DeliveryFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Weekly => f.write_str("weekly"),
            Self::BiWeekly => f.write_str("bi-weekly"),
            Self::Monthly => f.write_str("monthly"),
        }
    }
}

/// Error returned when parsing a delivery frequency from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDeliveryFrequencyError;

impl fmt::Display for ParseDeliveryFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid delivery frequency")
    }
}

impl std::error::Error for ParseDeliveryFrequencyError {}

impl FromStr for DeliveryFrequency {
    type Err = ParseDeliveryFrequencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "bi-weekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParseDeliveryFrequencyError),
        }
    }
}

/// Validated set of delivery weekdays, indexed 0–6 with 0 = Sunday.
///
/// ## Invariants
/// - Every index is in `0..=6`.
/// - Non-empty exactly when the owning frequency is weekly or bi-weekly;
///   empty for daily and monthly schedules ([`DeliveryDays::for_frequency`]
///   normalises any supplied days away for those).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DeliveryDays(Vec<u8>);

impl TryFrom<Vec<u8>> for DeliveryDays {
    type Error = ScheduleValidationError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<DeliveryDays> for Vec<u8> {
    fn from(value: DeliveryDays) -> Self {
        value.0
    }
}

impl DeliveryDays {
    /// Validate a raw list of weekday indices, deduplicating and sorting.
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self, ScheduleValidationError> {
        let mut validated: Vec<u8> = Vec::new();
        for index in days {
            if index > 6 {
                return Err(ScheduleValidationError::InvalidWeekdayIndex { index });
            }
            if !validated.contains(&index) {
                validated.push(index);
            }
        }
        validated.sort_unstable();
        Ok(Self(validated))
    }

    /// Construct an empty set for frequencies without weekday selection.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Validate delivery days against the frequency's requirements.
    ///
    /// Weekly and bi-weekly schedules must provide at least one day; any days
    /// supplied for daily or monthly schedules are dropped.
    pub fn for_frequency(
        frequency: DeliveryFrequency,
        days: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ScheduleValidationError> {
        let validated = Self::new(days)?;
        if frequency.requires_delivery_days() {
            if validated.is_empty() {
                return Err(ScheduleValidationError::EmptyDeliveryDays { frequency });
            }
            Ok(validated)
        } else {
            Ok(Self::none())
        }
    }

    /// Whether no delivery day is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the given date's weekday is a configured delivery day.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        let index = date.weekday().num_days_from_sunday();
        self.0.iter().any(|day| u32::from(*day) == index)
    }

    /// Sorted weekday indices.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// Compute the earliest qualifying delivery date on or after `reference_date`.
///
/// `start_date` anchors bi-weekly cycle parity and the monthly day-of-month;
/// the result is never before it. Weekly and bi-weekly scans fail with a
/// configuration error when the day set is empty, which is unreachable once
/// [`DeliveryDays::for_frequency`] has validated the schedule.
///
/// # Examples
/// ```
/// use backend::domain::{DeliveryDays, DeliveryFrequency, next_delivery_date};
/// use chrono::NaiveDate;
///
/// let days = DeliveryDays::new([1, 3, 5])?; // Mon/Wed/Fri
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
/// let next = next_delivery_date(DeliveryFrequency::Weekly, &days, start, start)?;
/// assert_eq!(next, start); // 2024-01-01 is a Monday
/// # Ok::<(), backend::domain::ScheduleValidationError>(())
/// ```
pub fn next_delivery_date(
    frequency: DeliveryFrequency,
    delivery_days: &DeliveryDays,
    start_date: NaiveDate,
    reference_date: NaiveDate,
) -> Result<NaiveDate, ScheduleValidationError> {
    let base = reference_date.max(start_date);
    match frequency {
        DeliveryFrequency::Daily => Ok(base),
        DeliveryFrequency::Weekly => scan_forward(frequency, base, 7, |candidate| {
            delivery_days.contains_date(candidate)
        }),
        DeliveryFrequency::BiWeekly => scan_forward(frequency, base, 14, |candidate| {
            delivery_days.contains_date(candidate) && on_even_week(start_date, candidate)
        }),
        DeliveryFrequency::Monthly => Ok(next_monthly(start_date, base)),
    }
}

/// Scan day-by-day from `base` (inclusive) for the first qualifying date.
fn scan_forward(
    frequency: DeliveryFrequency,
    base: NaiveDate,
    horizon_days: i64,
    qualifies: impl Fn(NaiveDate) -> bool,
) -> Result<NaiveDate, ScheduleValidationError> {
    for offset in 0..horizon_days {
        let candidate = base + Duration::days(offset);
        if qualifies(candidate) {
            return Ok(candidate);
        }
    }
    Err(ScheduleValidationError::EmptyDeliveryDays { frequency })
}

/// Whether `candidate` falls in an even whole-week offset from `start`.
///
/// `candidate` is never before `start`, so the integer division floors
/// towards zero as required.
fn on_even_week(start: NaiveDate, candidate: NaiveDate) -> bool {
    let week_index = (candidate - start).num_days() / 7;
    week_index % 2 == 0
}

/// Same day-of-month as `start`, clamped to shorter months, advanced until
/// it reaches `base`.
fn next_monthly(start: NaiveDate, base: NaiveDate) -> NaiveDate {
    let target_day = start.day();
    let mut year = base.year();
    let mut month = base.month();
    loop {
        let day = target_day.min(last_day_of_month(year, month));
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(candidate) if candidate >= base => return candidate,
            _ => {}
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}
