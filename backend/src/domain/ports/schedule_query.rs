//! Driving port for schedule read operations.
//!
//! Inbound adapters use this port to read persisted schedules and the
//! per-practitioner delivery statistics without depending on repository
//! details.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DeliveryStats, Error, PractitionerId};

use super::schedule_command::SchedulePayload;

/// Request to fetch one schedule by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetScheduleRequest {
    pub practitioner_id: PractitionerId,
    pub schedule_id: Uuid,
}

/// Response for a single schedule lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetScheduleResponse {
    pub schedule: SchedulePayload,
}

/// Request to list a practitioner's schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchedulesRequest {
    pub practitioner_id: PractitionerId,
}

/// Response containing a practitioner's schedules, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchedulesResponse {
    pub schedules: Vec<SchedulePayload>,
}

/// Request for aggregated delivery statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeliveryStatsRequest {
    pub practitioner_id: PractitionerId,
    /// Reference date for the upcoming and this-week buckets.
    pub today: NaiveDate,
}

/// Response containing aggregated delivery statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeliveryStatsResponse {
    pub stats: DeliveryStats,
}

/// Driving port for schedule read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    /// Fetches one persisted schedule by identifier.
    ///
    /// Accepts `GetScheduleRequest` and returns `GetScheduleResponse`.
    async fn get_schedule(&self, request: GetScheduleRequest)
    -> Result<GetScheduleResponse, Error>;

    /// Lists all schedules owned by a practitioner.
    ///
    /// Accepts `ListSchedulesRequest` and returns `ListSchedulesResponse`.
    async fn list_schedules(
        &self,
        request: ListSchedulesRequest,
    ) -> Result<ListSchedulesResponse, Error>;

    /// Aggregates delivery statistics for a practitioner.
    ///
    /// Accepts `GetDeliveryStatsRequest` and returns
    /// `GetDeliveryStatsResponse`.
    async fn get_delivery_stats(
        &self,
        request: GetDeliveryStatsRequest,
    ) -> Result<GetDeliveryStatsResponse, Error>;
}

/// Fixture query implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScheduleQuery;

#[async_trait]
impl ScheduleQuery for FixtureScheduleQuery {
    async fn get_schedule(
        &self,
        request: GetScheduleRequest,
    ) -> Result<GetScheduleResponse, Error> {
        Err(Error::not_found(format!(
            "schedule {} not found",
            request.schedule_id
        )))
    }

    async fn list_schedules(
        &self,
        _request: ListSchedulesRequest,
    ) -> Result<ListSchedulesResponse, Error> {
        Ok(ListSchedulesResponse {
            schedules: Vec::new(),
        })
    }

    async fn get_delivery_stats(
        &self,
        _request: GetDeliveryStatsRequest,
    ) -> Result<GetDeliveryStatsResponse, Error> {
        Ok(GetDeliveryStatsResponse {
            stats: DeliveryStats::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_query_returns_not_found_for_get() {
        let query = FixtureScheduleQuery;
        let request = GetScheduleRequest {
            practitioner_id: PractitionerId::random(),
            schedule_id: Uuid::new_v4(),
        };

        let error = query.get_schedule(request).await.expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fixture_query_returns_empty_list_and_zero_stats() {
        let query = FixtureScheduleQuery;
        let practitioner_id = PractitionerId::random();

        let listed = query
            .list_schedules(ListSchedulesRequest {
                practitioner_id: practitioner_id.clone(),
            })
            .await
            .expect("fixture list succeeds");
        let stats = query
            .get_delivery_stats(GetDeliveryStatsRequest {
                practitioner_id,
                today: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid fixture date"),
            })
            .await
            .expect("fixture stats succeed");

        assert!(listed.schedules.is_empty());
        assert_eq!(stats.stats, DeliveryStats::default());
    }
}
