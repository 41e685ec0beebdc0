//! Schedule domain services.
//!
//! These services implement the schedule driving ports on top of the
//! repository, delivery-log, and notifier ports. All writes that follow a
//! read go through the repository's version-checked update so concurrent
//! mutations surface as conflicts instead of lost updates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::schedules::{DeliveryLogEntry, Schedule, ScheduleValidationError, week_bounds};
use crate::domain::{DeliveryStats, Error, ScheduleStatus};
use crate::domain::ports::{
    AdvanceScheduleRequest, AdvanceScheduleResponse, CreateScheduleRequest,
    CreateScheduleResponse, DeleteScheduleRequest, DeleteScheduleResponse, DeliveryLogRepository,
    DeliveryLogRepositoryError, DeliveryNotifier, DeliveryReminder, GetDeliveryStatsRequest,
    GetDeliveryStatsResponse, GetScheduleRequest, GetScheduleResponse, ListSchedulesRequest,
    ListSchedulesResponse, ScheduleCommand, SchedulePayload, ScheduleQuery, ScheduleRepository,
    ScheduleRepositoryError, UpdateScheduleStatusRequest, UpdateScheduleStatusResponse,
};

fn map_repository_error(error: ScheduleRepositoryError) -> Error {
    match error {
        ScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schedule repository unavailable: {message}"))
        }
        ScheduleRepositoryError::Query { message } => {
            Error::internal(format!("schedule repository error: {message}"))
        }
    }
}

fn map_log_repository_error(error: DeliveryLogRepositoryError) -> Error {
    match error {
        DeliveryLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("delivery log repository unavailable: {message}"))
        }
        DeliveryLogRepositoryError::Query { message } => {
            Error::internal(format!("delivery log repository error: {message}"))
        }
    }
}

fn map_validation_error(error: ScheduleValidationError) -> Error {
    match error {
        ScheduleValidationError::InvalidTransition { .. }
        | ScheduleValidationError::ScheduleNotActive { .. } => Error::conflict(error.to_string()),
        other => Error::invalid_request(format!("invalid schedule payload: {other}")),
    }
}

fn stale_version_error(schedule: &Schedule) -> Error {
    Error::conflict(format!(
        "schedule {} was modified concurrently; retry with fresh state",
        schedule.id()
    ))
}

/// Schedule service implementing the command driving port.
#[derive(Clone)]
pub struct ScheduleCommandService<R, L, N> {
    schedule_repo: Arc<R>,
    delivery_log_repo: Arc<L>,
    notifier: Arc<N>,
}

impl<R, L, N> ScheduleCommandService<R, L, N> {
    /// Create a new command service from its outbound collaborators.
    pub fn new(schedule_repo: Arc<R>, delivery_log_repo: Arc<L>, notifier: Arc<N>) -> Self {
        Self {
            schedule_repo,
            delivery_log_repo,
            notifier,
        }
    }
}

impl<R, L, N> ScheduleCommandService<R, L, N>
where
    N: DeliveryNotifier,
{
    /// Hand the next delivery to the notifier when notifications are on.
    ///
    /// Dispatch failures are logged and swallowed: the schedule mutation has
    /// already been persisted and must not be rolled back over a reminder.
    async fn schedule_reminder(&self, schedule: &Schedule) {
        if !schedule.notification_enabled() {
            return;
        }
        let Some(deliver_on) = schedule.next_delivery_date() else {
            return;
        };

        let reminder = DeliveryReminder {
            schedule_id: schedule.id(),
            client_id: schedule.client_id(),
            deliver_on,
            deliver_at: schedule.delivery_time(),
            lead_days: schedule.notification_days_before(),
        };
        if let Err(err) = self.notifier.schedule_reminder(reminder).await {
            tracing::warn!(
                schedule_id = %schedule.id(),
                error = %err,
                "delivery reminder dispatch failed"
            );
        }
    }
}

#[async_trait]
impl<R, L, N> ScheduleCommand for ScheduleCommandService<R, L, N>
where
    R: ScheduleRepository,
    L: DeliveryLogRepository,
    N: DeliveryNotifier,
{
    async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<CreateScheduleResponse, Error> {
        let schedule = request
            .schedule
            .into_schedule(request.practitioner_id)
            .map_err(map_validation_error)?;

        self.schedule_repo
            .insert(&schedule)
            .await
            .map_err(map_repository_error)?;
        self.schedule_reminder(&schedule).await;

        Ok(CreateScheduleResponse {
            schedule: schedule.into(),
        })
    }

    async fn update_status(
        &self,
        request: UpdateScheduleStatusRequest,
    ) -> Result<UpdateScheduleStatusResponse, Error> {
        let mut schedule = self
            .schedule_repo
            .find_for_practitioner(&request.practitioner_id, &request.schedule_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("schedule {} not found", request.schedule_id))
            })?;

        let expected_version = schedule.version();
        schedule
            .apply_status(request.status)
            .map_err(map_validation_error)?;

        let written = self
            .schedule_repo
            .update_if_version(&schedule, expected_version)
            .await
            .map_err(map_repository_error)?;
        if !written {
            return Err(stale_version_error(&schedule));
        }
        schedule.bump_version();

        Ok(UpdateScheduleStatusResponse {
            schedule: schedule.into(),
        })
    }

    async fn advance_schedule(
        &self,
        request: AdvanceScheduleRequest,
    ) -> Result<AdvanceScheduleResponse, Error> {
        let mut schedule = self
            .schedule_repo
            .find_for_practitioner(&request.practitioner_id, &request.schedule_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("schedule {} not found", request.schedule_id))
            })?;

        let expected_version = schedule.version();
        schedule
            .advance(request.delivered_on)
            .map_err(map_validation_error)?;

        let written = self
            .schedule_repo
            .update_if_version(&schedule, expected_version)
            .await
            .map_err(map_repository_error)?;
        if !written {
            return Err(stale_version_error(&schedule));
        }
        schedule.bump_version();

        // The schedule row has already committed; a failed log append must
        // not fail the advance, or a retry would double-count deliveries.
        let entry = DeliveryLogEntry::sent(schedule.id(), request.delivered_on, Utc::now());
        if let Err(err) = self.delivery_log_repo.append(&entry).await {
            tracing::warn!(
                schedule_id = %schedule.id(),
                error = %err,
                "delivery log append failed after advance"
            );
        }
        self.schedule_reminder(&schedule).await;

        Ok(AdvanceScheduleResponse {
            schedule: schedule.into(),
        })
    }

    async fn delete_schedule(
        &self,
        request: DeleteScheduleRequest,
    ) -> Result<DeleteScheduleResponse, Error> {
        let deleted = self
            .schedule_repo
            .delete_for_practitioner(&request.practitioner_id, &request.schedule_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!(
                "schedule {} not found",
                request.schedule_id
            )));
        }

        Ok(DeleteScheduleResponse {
            schedule_id: request.schedule_id,
        })
    }
}

/// Schedule service implementing the query driving port.
#[derive(Clone)]
pub struct ScheduleQueryService<R, L> {
    schedule_repo: Arc<R>,
    delivery_log_repo: Arc<L>,
}

impl<R, L> ScheduleQueryService<R, L> {
    /// Create a new query service from its outbound collaborators.
    pub fn new(schedule_repo: Arc<R>, delivery_log_repo: Arc<L>) -> Self {
        Self {
            schedule_repo,
            delivery_log_repo,
        }
    }
}

#[async_trait]
impl<R, L> ScheduleQuery for ScheduleQueryService<R, L>
where
    R: ScheduleRepository,
    L: DeliveryLogRepository,
{
    async fn get_schedule(
        &self,
        request: GetScheduleRequest,
    ) -> Result<GetScheduleResponse, Error> {
        let schedule = self
            .schedule_repo
            .find_for_practitioner(&request.practitioner_id, &request.schedule_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("schedule {} not found", request.schedule_id))
            })?;

        Ok(GetScheduleResponse {
            schedule: SchedulePayload::from(schedule),
        })
    }

    async fn list_schedules(
        &self,
        request: ListSchedulesRequest,
    ) -> Result<ListSchedulesResponse, Error> {
        let schedules = self
            .schedule_repo
            .list_for_practitioner(&request.practitioner_id)
            .await
            .map_err(map_repository_error)?;

        Ok(ListSchedulesResponse {
            schedules: schedules.into_iter().map(Into::into).collect(),
        })
    }

    async fn get_delivery_stats(
        &self,
        request: GetDeliveryStatsRequest,
    ) -> Result<GetDeliveryStatsResponse, Error> {
        let practitioner = &request.practitioner_id;
        let (week_start, week_end) = week_bounds(request.today);

        let total_schedules = self
            .schedule_repo
            .count_schedules(practitioner)
            .await
            .map_err(map_repository_error)?;
        let active_schedules = self
            .schedule_repo
            .count_with_status(practitioner, ScheduleStatus::Active)
            .await
            .map_err(map_repository_error)?;
        let upcoming_deliveries = self
            .schedule_repo
            .count_upcoming(practitioner, request.today)
            .await
            .map_err(map_repository_error)?;
        let completed_deliveries = self
            .delivery_log_repo
            .count_completed(practitioner)
            .await
            .map_err(map_log_repository_error)?;
        let deliveries_this_week = self
            .delivery_log_repo
            .count_between(practitioner, week_start, week_end)
            .await
            .map_err(map_log_repository_error)?;

        Ok(GetDeliveryStatsResponse {
            stats: DeliveryStats {
                total_schedules,
                active_schedules,
                upcoming_deliveries,
                completed_deliveries,
                deliveries_this_week,
            },
        })
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
