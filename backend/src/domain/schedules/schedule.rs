//! Schedule entity, creation draft, and persisted record form.

use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::domain::PractitionerId;

use super::{
    DeliveryDays, DeliveryFrequency, ScheduleStatus, ScheduleValidationError, next_delivery_date,
};

/// Input payload for [`Schedule::new`].
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub id: Uuid,
    pub practitioner_id: PractitionerId,
    pub client_id: Uuid,
    pub meal_plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: DeliveryFrequency,
    pub delivery_days: Vec<u8>,
    pub delivery_time: NaiveTime,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
}

/// Full persisted state of a schedule, used to rehydrate from storage.
#[derive(Debug, Clone)]
pub struct ScheduleRecord {
    pub id: Uuid,
    pub practitioner_id: PractitionerId,
    pub client_id: Uuid,
    pub meal_plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: DeliveryFrequency,
    pub delivery_days: Vec<u8>,
    pub delivery_time: NaiveTime,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    pub next_delivery_date: Option<NaiveDate>,
    pub total_deliveries: i64,
    pub status: ScheduleStatus,
    pub version: i64,
}

/// A validated recurring delivery schedule.
///
/// ## Invariants
/// - `name` is non-blank.
/// - `end_date`, when present, is on or after `start_date`.
/// - `delivery_days` satisfies the frequency's requirements.
/// - `notification_days_before` and `total_deliveries` are non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub(super) id: Uuid,
    pub(super) practitioner_id: PractitionerId,
    pub(super) client_id: Uuid,
    pub(super) meal_plan_id: Uuid,
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) start_date: NaiveDate,
    pub(super) end_date: Option<NaiveDate>,
    pub(super) frequency: DeliveryFrequency,
    pub(super) delivery_days: DeliveryDays,
    pub(super) delivery_time: NaiveTime,
    pub(super) auto_generate_next: bool,
    pub(super) notification_enabled: bool,
    pub(super) notification_days_before: i32,
    pub(super) next_delivery_date: Option<NaiveDate>,
    pub(super) total_deliveries: i64,
    pub(super) status: ScheduleStatus,
    pub(super) version: i64,
}

impl Schedule {
    /// Create a validated schedule from a creation draft.
    ///
    /// The initial `next_delivery_date` is computed from the start date; a
    /// freshly created schedule is active with zero recorded deliveries.
    pub fn new(draft: ScheduleDraft) -> Result<Self, ScheduleValidationError> {
        let name = validate_name(draft.name)?;
        validate_dates(draft.start_date, draft.end_date)?;
        validate_notification_lead(draft.notification_days_before)?;
        let delivery_days = DeliveryDays::for_frequency(draft.frequency, draft.delivery_days)?;

        let first = next_delivery_date(
            draft.frequency,
            &delivery_days,
            draft.start_date,
            draft.start_date,
        )?;
        let next = clip_to_end(first, draft.end_date);

        Ok(Self {
            id: draft.id,
            practitioner_id: draft.practitioner_id,
            client_id: draft.client_id,
            meal_plan_id: draft.meal_plan_id,
            name,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            frequency: draft.frequency,
            delivery_days,
            delivery_time: draft.delivery_time,
            auto_generate_next: draft.auto_generate_next,
            notification_enabled: draft.notification_enabled,
            notification_days_before: draft.notification_days_before,
            next_delivery_date: next,
            total_deliveries: 0,
            status: ScheduleStatus::Active,
            version: 0,
        })
    }

    /// Rehydrate a schedule from its persisted record.
    pub fn from_record(record: ScheduleRecord) -> Result<Self, ScheduleValidationError> {
        let name = validate_name(record.name)?;
        validate_dates(record.start_date, record.end_date)?;
        validate_notification_lead(record.notification_days_before)?;
        if record.total_deliveries < 0 {
            return Err(ScheduleValidationError::NegativeDeliveryCount {
                count: record.total_deliveries,
            });
        }
        let delivery_days = DeliveryDays::for_frequency(record.frequency, record.delivery_days)?;

        Ok(Self {
            id: record.id,
            practitioner_id: record.practitioner_id,
            client_id: record.client_id,
            meal_plan_id: record.meal_plan_id,
            name,
            description: record.description,
            start_date: record.start_date,
            end_date: record.end_date,
            frequency: record.frequency,
            delivery_days,
            delivery_time: record.delivery_time,
            auto_generate_next: record.auto_generate_next,
            notification_enabled: record.notification_enabled,
            notification_days_before: record.notification_days_before,
            next_delivery_date: record.next_delivery_date,
            total_deliveries: record.total_deliveries,
            status: record.status,
            version: record.version,
        })
    }

    /// Apply a practitioner-initiated status transition.
    pub fn apply_status(&mut self, target: ScheduleStatus) -> Result<(), ScheduleValidationError> {
        self.status = self.status.transition_to(target)?;
        Ok(())
    }

    /// Record a delivery and recompute the next delivery date.
    ///
    /// `delivered_on` is the date the delivery went out; the next occurrence
    /// is computed from the day after it. When the recurrence runs past
    /// `end_date` the next delivery date becomes `None` — the schedule stays
    /// active until the practitioner completes it explicitly.
    pub fn advance(&mut self, delivered_on: NaiveDate) -> Result<(), ScheduleValidationError> {
        if self.status != ScheduleStatus::Active {
            return Err(ScheduleValidationError::ScheduleNotActive {
                status: self.status,
            });
        }

        let next = next_delivery_date(
            self.frequency,
            &self.delivery_days,
            self.start_date,
            delivered_on + Duration::days(1),
        )?;
        self.next_delivery_date = clip_to_end(next, self.end_date);
        self.total_deliveries += 1;
        Ok(())
    }

    /// Returns the schedule id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the owning practitioner id.
    pub fn practitioner_id(&self) -> &PractitionerId {
        &self.practitioner_id
    }

    /// Returns the client the meal plan is delivered to.
    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    /// Returns the delivered meal plan id.
    pub fn meal_plan_id(&self) -> Uuid {
        self.meal_plan_id
    }

    /// Returns the schedule name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the free-text description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the first eligible delivery date.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the optional last eligible delivery date.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the recurrence frequency.
    pub fn frequency(&self) -> DeliveryFrequency {
        self.frequency
    }

    /// Returns the configured delivery weekdays.
    pub fn delivery_days(&self) -> &DeliveryDays {
        &self.delivery_days
    }

    /// Returns the delivery time-of-day stored alongside the dates.
    pub fn delivery_time(&self) -> NaiveTime {
        self.delivery_time
    }

    /// Whether a successor meal plan is generated automatically.
    pub fn auto_generate_next(&self) -> bool {
        self.auto_generate_next
    }

    /// Whether client notifications are enabled.
    pub fn notification_enabled(&self) -> bool {
        self.notification_enabled
    }

    /// Notification lead time in days before the delivery date.
    pub fn notification_days_before(&self) -> i32 {
        self.notification_days_before
    }

    /// Returns the precomputed next delivery date, if one remains.
    pub fn next_delivery_date(&self) -> Option<NaiveDate> {
        self.next_delivery_date
    }

    /// Returns the count of recorded deliveries.
    pub fn total_deliveries(&self) -> i64 {
        self.total_deliveries
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    /// Advance the version token after a version-checked write succeeded.
    ///
    /// The persistence layer bumps the stored version as part of the
    /// compare-and-set update; callers invoke this so the in-memory entity
    /// matches the row that was just written.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Returns the optimistic-concurrency version token.
    ///
    /// The persistence layer only applies an update when the stored version
    /// still matches this value, so concurrent advances cannot double-count.
    pub fn version(&self) -> i64 {
        self.version
    }
}

impl TryFrom<ScheduleDraft> for Schedule {
    type Error = ScheduleValidationError;

    fn try_from(value: ScheduleDraft) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn validate_name(name: String) -> Result<String, ScheduleValidationError> {
    if name.trim().is_empty() {
        return Err(ScheduleValidationError::EmptyName);
    }
    Ok(name)
}

fn validate_dates(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), ScheduleValidationError> {
    if end_date.is_some_and(|end| end < start_date) {
        return Err(ScheduleValidationError::EndBeforeStart);
    }
    Ok(())
}

fn validate_notification_lead(days: i32) -> Result<(), ScheduleValidationError> {
    if days < 0 {
        return Err(ScheduleValidationError::NegativeNotificationLead { days });
    }
    Ok(())
}

fn clip_to_end(candidate: NaiveDate, end_date: Option<NaiveDate>) -> Option<NaiveDate> {
    match end_date {
        Some(end) if candidate > end => None,
        _ => Some(candidate),
    }
}
