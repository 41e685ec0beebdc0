//! Recurring meal-plan delivery schedule domain types.
//!
//! A schedule captures a practitioner-configured recurrence rule for sending
//! a meal plan to a client. The recurrence calculator derives concrete
//! delivery dates from that rule, the status enum models the schedule
//! lifecycle, and delivery stats form the read model consumed by reporting
//! endpoints.

use std::fmt;

mod delivery_log;
mod recurrence;
mod schedule;
mod stats;
mod status;

pub use delivery_log::DeliveryLogEntry;
pub use recurrence::{DeliveryDays, DeliveryFrequency, ParseDeliveryFrequencyError, next_delivery_date};
pub use schedule::{Schedule, ScheduleDraft, ScheduleRecord};
pub use stats::{DeliveryStats, week_bounds};
pub use status::{ParseScheduleStatusError, ScheduleStatus};

/// Validation errors raised by schedule constructors and transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValidationError {
    EmptyName,
    InvalidWeekdayIndex { index: u8 },
    EmptyDeliveryDays { frequency: DeliveryFrequency },
    EndBeforeStart,
    NegativeNotificationLead { days: i32 },
    InvalidTransition { from: ScheduleStatus, to: ScheduleStatus },
    ScheduleNotActive { status: ScheduleStatus },
    NegativeDeliveryCount { count: i64 },
}

impl fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "schedule name must not be blank"),
            Self::InvalidWeekdayIndex { index } => {
                write!(f, "delivery day index {index} must be in 0..=6 (0 = Sunday)")
            }
            Self::EmptyDeliveryDays { frequency } => {
                write!(f, "{frequency} schedules require at least one delivery day")
            }
            Self::EndBeforeStart => {
                write!(f, "schedule end_date must be on or after start_date")
            }
            Self::NegativeNotificationLead { days } => {
                write!(f, "notification lead must be non-negative (got {days})")
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "schedule status cannot change from {from} to {to}")
            }
            Self::ScheduleNotActive { status } => {
                write!(f, "only active schedules can advance (status is {status})")
            }
            Self::NegativeDeliveryCount { count } => {
                write!(f, "total delivery count must be non-negative (got {count})")
            }
        }
    }
}

impl std::error::Error for ScheduleValidationError {}
