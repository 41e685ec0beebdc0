//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - PractitionerId — validated owner identity for schedules.
//! - Schedule, ScheduleStatus, DeliveryFrequency — the schedule aggregate.
//! - DeliveryStats — per-practitioner delivery read model.
//! - ports — hexagonal boundary traits and payload types.
//! - ScheduleCommandService / ScheduleQueryService — driving-port services.

pub mod error;
pub mod ports;
pub mod practitioner;
pub mod schedule_service;
pub mod schedules;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::practitioner::{PractitionerId, PractitionerValidationError};
pub use self::schedule_service::{ScheduleCommandService, ScheduleQueryService};
pub use self::schedules::{
    DeliveryDays, DeliveryFrequency, DeliveryLogEntry, DeliveryStats, ParseDeliveryFrequencyError,
    ParseScheduleStatusError, Schedule, ScheduleDraft, ScheduleRecord, ScheduleStatus,
    ScheduleValidationError, next_delivery_date, week_bounds,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
