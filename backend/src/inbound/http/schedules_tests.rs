//! Tests for schedule HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use serde_json::Value;

use super::*;
use crate::inbound::http::rate_limit::{RateLimitConfig, RateLimiter};
use crate::inbound::http::state::HttpStatePorts;

const FIXTURE_PRACTITIONER: &str = "00000000-0000-0000-0000-000000000101";

fn test_app_with(
    ports: HttpStatePorts,
    rate_limiter: Arc<RateLimiter>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(ports, rate_limiter);
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .route(
            "/test-login",
            web::post().to(|session: SessionContext| async move {
                let id = PractitionerId::new(FIXTURE_PRACTITIONER).expect("fixture id");
                session.persist_practitioner(&id)?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
        .service(
            web::scope("/api/v1")
                .service(create_schedule)
                .service(list_schedules)
                .service(get_delivery_stats)
                .service(get_schedule)
                .service(update_schedule_status)
                .service(advance_schedule)
                .service(delete_schedule),
        )
}

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app_with(HttpStatePorts::default(), Arc::new(RateLimiter::default()))
}

async fn login_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let login_res = actix_test::call_service(
        app,
        actix_test::TestRequest::post().uri("/test-login").to_request(),
    )
    .await;
    assert!(login_res.status().is_success());
    login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn sample_schedule_payload() -> Value {
    serde_json::json!({
        "clientId": "00000000-0000-0000-0000-000000000201",
        "mealPlanId": "00000000-0000-0000-0000-000000000301",
        "name": "Weekly meal plan",
        "startDate": "2024-01-01",
        "frequency": "weekly",
        "deliveryDays": [1, 3, 5],
        "deliveryTime": "09:00:00",
        "notificationEnabled": true,
        "notificationDaysBefore": 1
    })
}

#[actix_web::test]
async fn create_schedule_returns_precomputed_first_delivery() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/schedules")
        .cookie(cookie)
        .set_json(sample_schedule_payload())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    // 2024-01-01 is a Monday, the first configured delivery day.
    assert_eq!(
        body.get("nextDeliveryDate").and_then(Value::as_str),
        Some("2024-01-01")
    );
    assert_eq!(body.get("status").and_then(Value::as_str), Some("active"));
    assert_eq!(
        body.get("statusLabel").and_then(Value::as_str),
        Some("Active")
    );
    assert_eq!(
        body.get("frequencyLabel").and_then(Value::as_str),
        Some("Weekly")
    );
    assert_eq!(body.get("version").and_then(Value::as_i64), Some(0));
}

#[actix_web::test]
async fn create_schedule_rejects_invalid_client_id() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let mut payload = sample_schedule_payload();
    payload["clientId"] = Value::String("not-a-uuid".to_owned());

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/schedules")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_schedule_rejects_unknown_frequency() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let mut payload = sample_schedule_payload();
    payload["frequency"] = Value::String("fortnightly".to_owned());

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/schedules")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_frequency")
    );
}

#[actix_web::test]
async fn create_schedule_rejects_weekly_without_delivery_days() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let mut payload = sample_schedule_payload();
    payload["deliveryDays"] = serde_json::json!([]);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/schedules")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_schedule_enforces_rate_limit() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: 1,
        window: Duration::from_secs(3_600),
    }));
    let app =
        actix_test::init_service(test_app_with(HttpStatePorts::default(), limiter)).await;
    let cookie = login_and_get_cookie(&app).await;

    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules")
            .cookie(cookie.clone())
            .set_json(sample_schedule_payload())
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules")
            .cookie(cookie)
            .set_json(sample_schedule_payload())
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("rate_limited")
    );
}

#[actix_web::test]
async fn schedule_endpoints_require_authenticated_session() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules")
            .set_json(sample_schedule_payload())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules/stats")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_schedules_returns_empty_collection_from_fixture() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("schedules"), Some(&serde_json::json!([])));
}

#[actix_web::test]
async fn stats_route_wins_over_schedule_id_route() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules/stats")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("totalSchedules").and_then(Value::as_i64), Some(0));
    assert_eq!(
        body.get("deliveriesThisWeek").and_then(Value::as_i64),
        Some(0)
    );
}

#[actix_web::test]
async fn get_schedule_returns_not_found_from_fixture() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules/00000000-0000-0000-0000-000000000401")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_status_rejects_unknown_status_value() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/schedules/00000000-0000-0000-0000-000000000401/status")
            .cookie(cookie)
            .set_json(serde_json::json!({"status": "archived"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_status")
    );
}

#[actix_web::test]
async fn advance_rejects_malformed_delivered_on() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules/00000000-0000-0000-0000-000000000401/advance")
            .cookie(cookie)
            .set_json(serde_json::json!({"deliveredOn": "01/02/2024"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
