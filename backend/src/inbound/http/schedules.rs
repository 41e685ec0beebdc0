//! Schedule HTTP handlers.
//!
//! ```text
//! POST   /api/v1/schedules
//! GET    /api/v1/schedules
//! GET    /api/v1/schedules/stats
//! GET    /api/v1/schedules/{id}
//! PUT    /api/v1/schedules/{id}/status
//! POST   /api/v1/schedules/{id}/advance
//! DELETE /api/v1/schedules/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    AdvanceScheduleRequest, CreateSchedulePayload, CreateScheduleRequest, DeleteScheduleRequest,
    GetDeliveryStatsRequest, GetScheduleRequest, ListSchedulesRequest, SchedulePayload,
    UpdateScheduleStatusRequest,
};
use crate::domain::{DeliveryFrequency, DeliveryStats, Error, PractitionerId, ScheduleStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DeliveryStatsSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_optional_date, parse_time, parse_uuid,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Request payload for creating a schedule.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequestBody {
    #[schema(format = "uuid")]
    pub client_id: String,
    #[schema(format = "uuid")]
    pub meal_plan_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(format = "date", example = "2024-01-01")]
    pub start_date: String,
    #[schema(format = "date", example = "2024-03-31")]
    pub end_date: Option<String>,
    /// One of `daily`, `weekly`, `bi-weekly`, `monthly`.
    pub frequency: String,
    /// Weekday indices 0..=6 with 0 = Sunday; required for weekly and
    /// bi-weekly frequencies.
    #[serde(default)]
    pub delivery_days: Vec<u8>,
    #[schema(example = "09:00:00")]
    pub delivery_time: String,
    #[serde(default)]
    pub auto_generate_next: bool,
    #[serde(default)]
    pub notification_enabled: bool,
    #[serde(default = "default_notification_days_before")]
    pub notification_days_before: i32,
}

fn default_notification_days_before() -> i32 {
    1
}

/// Request payload for a status transition.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleStatusRequestBody {
    /// One of `active`, `paused`, `completed`, `cancelled`.
    pub status: String,
}

/// Request payload for recording a delivery.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceScheduleRequestBody {
    /// Date the delivery went out; defaults to today when omitted.
    #[schema(format = "date", example = "2024-01-01")]
    pub delivered_on: Option<String>,
}

/// Schedule representation returned by all schedule endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub client_id: String,
    #[schema(format = "uuid")]
    pub meal_plan_id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(format = "date")]
    pub start_date: String,
    #[schema(format = "date")]
    pub end_date: Option<String>,
    pub frequency: String,
    /// Display label for the frequency, mapped by the domain.
    pub frequency_label: String,
    pub delivery_days: Vec<u8>,
    pub delivery_time: String,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    #[schema(format = "date")]
    pub next_delivery_date: Option<String>,
    pub total_deliveries: i64,
    pub status: String,
    /// Display label for the status, mapped by the domain.
    pub status_label: String,
    /// Version token to detect concurrent modifications.
    pub version: i64,
}

/// Response payload listing a practitioner's schedules.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSchedulesResponseBody {
    pub schedules: Vec<ScheduleResponseBody>,
}

impl From<SchedulePayload> for ScheduleResponseBody {
    fn from(value: SchedulePayload) -> Self {
        Self {
            id: value.id.to_string(),
            client_id: value.client_id.to_string(),
            meal_plan_id: value.meal_plan_id.to_string(),
            name: value.name,
            description: value.description,
            start_date: value.start_date.format(DATE_FORMAT).to_string(),
            end_date: value
                .end_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
            frequency: value.frequency.to_string(),
            frequency_label: value.frequency.label().to_owned(),
            delivery_days: value.delivery_days,
            delivery_time: value.delivery_time.format(TIME_FORMAT).to_string(),
            auto_generate_next: value.auto_generate_next,
            notification_enabled: value.notification_enabled,
            notification_days_before: value.notification_days_before,
            next_delivery_date: value
                .next_delivery_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
            total_deliveries: value.total_deliveries,
            status: value.status.to_string(),
            status_label: value.status.label().to_owned(),
            version: value.version,
        }
    }
}

fn parse_frequency(value: String) -> Result<DeliveryFrequency, Error> {
    DeliveryFrequency::from_str(&value).map_err(|_| {
        Error::invalid_request("frequency must be daily, weekly, bi-weekly, or monthly")
            .with_details(json!({
                "field": "frequency",
                "value": value,
                "code": "invalid_frequency",
            }))
    })
}

fn parse_status(value: String) -> Result<ScheduleStatus, Error> {
    ScheduleStatus::from_str(&value).map_err(|_| {
        Error::invalid_request("status must be active, paused, completed, or cancelled")
            .with_details(json!({
                "field": "status",
                "value": value,
                "code": "invalid_status",
            }))
    })
}

fn parse_create_payload(body: CreateScheduleRequestBody) -> Result<CreateSchedulePayload, Error> {
    Ok(CreateSchedulePayload {
        client_id: parse_uuid(body.client_id, FieldName::new("clientId"))?,
        meal_plan_id: parse_uuid(body.meal_plan_id, FieldName::new("mealPlanId"))?,
        name: body.name,
        description: body.description,
        start_date: parse_date(body.start_date, FieldName::new("startDate"))?,
        end_date: parse_optional_date(body.end_date, FieldName::new("endDate"))?,
        frequency: parse_frequency(body.frequency)?,
        delivery_days: body.delivery_days,
        delivery_time: parse_time(body.delivery_time, FieldName::new("deliveryTime"))?,
        auto_generate_next: body.auto_generate_next,
        notification_enabled: body.notification_enabled,
        notification_days_before: body.notification_days_before,
    })
}

/// Authenticate and apply the create-endpoint rate limit.
///
/// Only schedule creation is limited; reads and single-row mutations are
/// cheap enough to leave unthrottled.
fn authorise_create(
    state: &HttpState,
    session: &SessionContext,
) -> Result<PractitionerId, Error> {
    let practitioner_id = session.require_practitioner_id()?;
    state.rate_limiter.check(practitioner_id.as_ref())?;
    Ok(practitioner_id)
}

/// Create a delivery schedule for the authenticated practitioner.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateScheduleRequestBody,
    responses(
        (status = 200, description = "Schedule created", body = ScheduleResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 429, description = "Rate limit exceeded", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "createSchedule",
    security(("SessionCookie" = []))
)]
#[post("/schedules")]
pub async fn create_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateScheduleRequestBody>,
) -> ApiResult<web::Json<ScheduleResponseBody>> {
    let practitioner_id = authorise_create(&state, &session)?;
    let schedule = parse_create_payload(payload.into_inner())?;

    let response = state
        .schedules
        .create_schedule(CreateScheduleRequest {
            practitioner_id,
            schedule,
        })
        .await?;

    Ok(web::Json(ScheduleResponseBody::from(response.schedule)))
}

/// List the authenticated practitioner's schedules, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    responses(
        (status = 200, description = "Schedules for the practitioner", body = ListSchedulesResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "listSchedules",
    security(("SessionCookie" = []))
)]
#[get("/schedules")]
pub async fn list_schedules(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListSchedulesResponseBody>> {
    let practitioner_id = session.require_practitioner_id()?;

    let response = state
        .schedules_query
        .list_schedules(ListSchedulesRequest { practitioner_id })
        .await?;

    Ok(web::Json(ListSchedulesResponseBody {
        schedules: response
            .schedules
            .into_iter()
            .map(ScheduleResponseBody::from)
            .collect(),
    }))
}

/// Aggregate delivery statistics for the authenticated practitioner.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/stats",
    responses(
        (status = 200, description = "Delivery statistics", body = DeliveryStatsSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "getDeliveryStats",
    security(("SessionCookie" = []))
)]
#[get("/schedules/stats")]
pub async fn get_delivery_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DeliveryStats>> {
    let practitioner_id = session.require_practitioner_id()?;

    let response = state
        .schedules_query
        .get_delivery_stats(GetDeliveryStatsRequest {
            practitioner_id,
            today: Utc::now().date_naive(),
        })
        .await?;

    Ok(web::Json(response.stats))
}

/// Fetch one schedule by id.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Schedule found", body = ScheduleResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Schedule not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "getSchedule",
    security(("SessionCookie" = []))
)]
#[get("/schedules/{id}")]
pub async fn get_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ScheduleResponseBody>> {
    let practitioner_id = session.require_practitioner_id()?;

    let response = state
        .schedules_query
        .get_schedule(GetScheduleRequest {
            practitioner_id,
            schedule_id: path.into_inner(),
        })
        .await?;

    Ok(web::Json(ScheduleResponseBody::from(response.schedule)))
}

/// Transition a schedule between lifecycle states.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{id}/status",
    params(("id" = Uuid, Path, description = "Schedule identifier")),
    request_body = UpdateScheduleStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = ScheduleResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Schedule not found", body = ErrorSchema),
        (status = 409, description = "Transition not permitted or concurrent modification", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "updateScheduleStatus",
    security(("SessionCookie" = []))
)]
#[put("/schedules/{id}/status")]
pub async fn update_schedule_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateScheduleStatusRequestBody>,
) -> ApiResult<web::Json<ScheduleResponseBody>> {
    let practitioner_id = session.require_practitioner_id()?;
    let status = parse_status(payload.into_inner().status)?;

    let response = state
        .schedules
        .update_status(UpdateScheduleStatusRequest {
            practitioner_id,
            schedule_id: path.into_inner(),
            status,
        })
        .await?;

    Ok(web::Json(ScheduleResponseBody::from(response.schedule)))
}

/// Record a delivery and roll the schedule to its next occurrence.
#[utoipa::path(
    post,
    path = "/api/v1/schedules/{id}/advance",
    params(("id" = Uuid, Path, description = "Schedule identifier")),
    request_body = AdvanceScheduleRequestBody,
    responses(
        (status = 200, description = "Delivery recorded", body = ScheduleResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Schedule not found", body = ErrorSchema),
        (status = 409, description = "Schedule not active or concurrent modification", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "advanceSchedule",
    security(("SessionCookie" = []))
)]
#[post("/schedules/{id}/advance")]
pub async fn advance_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<AdvanceScheduleRequestBody>,
) -> ApiResult<web::Json<ScheduleResponseBody>> {
    let practitioner_id = session.require_practitioner_id()?;
    let delivered_on = match payload.into_inner().delivered_on {
        Some(raw) => parse_date(raw, FieldName::new("deliveredOn"))?,
        None => Utc::now().date_naive(),
    };

    let response = state
        .schedules
        .advance_schedule(AdvanceScheduleRequest {
            practitioner_id,
            schedule_id: path.into_inner(),
            delivered_on,
        })
        .await?;

    Ok(web::Json(ScheduleResponseBody::from(response.schedule)))
}

/// Delete a schedule together with its delivery history.
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule identifier")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Schedule not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "deleteSchedule",
    security(("SessionCookie" = []))
)]
#[delete("/schedules/{id}")]
pub async fn delete_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let practitioner_id = session.require_practitioner_id()?;

    state
        .schedules
        .delete_schedule(DeleteScheduleRequest {
            practitioner_id,
            schedule_id: path.into_inner(),
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "schedules_tests.rs"]
mod tests;
