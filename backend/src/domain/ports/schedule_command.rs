//! Driving port for schedule mutations.
//!
//! Inbound adapters create, transition, advance, and delete schedules through
//! this port without depending on repository or notifier details.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    DeliveryFrequency, Error, PractitionerId, Schedule, ScheduleDraft, ScheduleStatus,
    ScheduleValidationError,
};

/// Client-supplied fields for creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulePayload {
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

impl CreateSchedulePayload {
    /// Build a validated schedule entity owned by `practitioner_id`.
    ///
    /// A fresh identifier is minted here so callers cannot choose ids.
    pub fn into_schedule(
        self,
        practitioner_id: PractitionerId,
    ) -> Result<Schedule, ScheduleValidationError> {
        Schedule::new(ScheduleDraft {
            id: Uuid::new_v4(),
            practitioner_id,
            client_id: self.client_id,
            meal_plan_id: self.meal_plan_id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            frequency: self.frequency,
            delivery_days: self.delivery_days,
            delivery_time: self.delivery_time,
            auto_generate_next: self.auto_generate_next,
            notification_enabled: self.notification_enabled,
            notification_days_before: self.notification_days_before,
        })
    }
}

/// Serializable schedule projection for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
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

impl From<Schedule> for SchedulePayload {
    fn from(value: Schedule) -> Self {
        Self {
            id: value.id(),
            practitioner_id: value.practitioner_id().clone(),
            client_id: value.client_id(),
            meal_plan_id: value.meal_plan_id(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
            start_date: value.start_date(),
            end_date: value.end_date(),
            frequency: value.frequency(),
            delivery_days: value.delivery_days().as_slice().to_vec(),
            delivery_time: value.delivery_time(),
            auto_generate_next: value.auto_generate_next(),
            notification_enabled: value.notification_enabled(),
            notification_days_before: value.notification_days_before(),
            next_delivery_date: value.next_delivery_date(),
            total_deliveries: value.total_deliveries(),
            status: value.status(),
            version: value.version(),
        }
    }
}

/// Request to create a schedule for a practitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub practitioner_id: PractitionerId,
    pub schedule: CreateSchedulePayload,
}

/// Response from creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleResponse {
    pub schedule: SchedulePayload,
}

/// Request to transition a schedule's lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleStatusRequest {
    pub practitioner_id: PractitionerId,
    pub schedule_id: Uuid,
    pub status: ScheduleStatus,
}

/// Response from a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleStatusResponse {
    pub schedule: SchedulePayload,
}

/// Request to record a delivery and roll the schedule forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceScheduleRequest {
    pub practitioner_id: PractitionerId,
    pub schedule_id: Uuid,
    /// Date the delivery went out, normally the stored next delivery date.
    pub delivered_on: NaiveDate,
}

/// Response from advancing a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceScheduleResponse {
    pub schedule: SchedulePayload,
}

/// Request to delete a schedule and its delivery history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScheduleRequest {
    pub practitioner_id: PractitionerId,
    pub schedule_id: Uuid,
}

/// Response from deleting a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScheduleResponse {
    pub schedule_id: Uuid,
}

/// Driving port for schedule write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleCommand: Send + Sync {
    /// Creates a schedule with its first delivery date precomputed.
    ///
    /// Accepts `CreateScheduleRequest` and returns `CreateScheduleResponse`.
    /// Callers should handle `Result::Err(Error)` for validation and
    /// persistence failures at the boundary layer.
    async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<CreateScheduleResponse, Error>;

    /// Applies a practitioner-initiated lifecycle transition.
    ///
    /// Rejected transitions surface as a conflict error.
    async fn update_status(
        &self,
        request: UpdateScheduleStatusRequest,
    ) -> Result<UpdateScheduleStatusResponse, Error>;

    /// Records a delivery, recomputes the next delivery date, and appends a
    /// delivery-log entry.
    ///
    /// A concurrent modification between read and write surfaces as a
    /// conflict error; callers may retry with fresh state.
    async fn advance_schedule(
        &self,
        request: AdvanceScheduleRequest,
    ) -> Result<AdvanceScheduleResponse, Error>;

    /// Deletes a schedule together with its delivery history.
    async fn delete_schedule(
        &self,
        request: DeleteScheduleRequest,
    ) -> Result<DeleteScheduleResponse, Error>;
}

/// Fixture command implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScheduleCommand;

#[async_trait]
impl ScheduleCommand for FixtureScheduleCommand {
    async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<CreateScheduleResponse, Error> {
        let schedule = request
            .schedule
            .into_schedule(request.practitioner_id)
            .map_err(|err| Error::invalid_request(format!("invalid schedule payload: {err}")))?;

        Ok(CreateScheduleResponse {
            schedule: schedule.into(),
        })
    }

    async fn update_status(
        &self,
        request: UpdateScheduleStatusRequest,
    ) -> Result<UpdateScheduleStatusResponse, Error> {
        Err(Error::not_found(format!(
            "schedule {} not found",
            request.schedule_id
        )))
    }

    async fn advance_schedule(
        &self,
        request: AdvanceScheduleRequest,
    ) -> Result<AdvanceScheduleResponse, Error> {
        Err(Error::not_found(format!(
            "schedule {} not found",
            request.schedule_id
        )))
    }

    async fn delete_schedule(
        &self,
        request: DeleteScheduleRequest,
    ) -> Result<DeleteScheduleResponse, Error> {
        Err(Error::not_found(format!(
            "schedule {} not found",
            request.schedule_id
        )))
    }
}
