//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Attach the request-scoped trace identifier when the error carries none.
fn with_current_trace_id(error: &Error) -> Error {
    match (error.trace_id(), TraceId::current()) {
        (None, Some(id)) => error.clone().with_trace_id(id.to_string()),
        _ => error.clone(),
    }
}

fn redact_if_internal(error: Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let error = with_current_trace_id(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = error.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(error))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("nope"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("stale"), StatusCode::CONFLICT)]
    #[case(Error::rate_limited("slow down"), StatusCode::TOO_MANY_REQUESTS)]
    #[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_codes_follow_error_code(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[tokio::test]
    async fn internal_errors_are_redacted_in_responses() {
        let error = Error::internal("connection string leaked");

        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(
            json.get("message").and_then(Value::as_str),
            Some("Internal server error")
        );
    }

    #[tokio::test]
    async fn conflict_messages_are_preserved() {
        let error = Error::conflict("schedule was modified concurrently");

        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");

        assert_eq!(
            json.get("message").and_then(Value::as_str),
            Some("schedule was modified concurrently")
        );
        assert_eq!(json.get("code").and_then(Value::as_str), Some("conflict"));
    }
}
