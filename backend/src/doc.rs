//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (schedules, health)
//! - **Schemas**: Domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`DeliveryStatsSchema`]) plus the schedule request and response bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schedules::{
    AdvanceScheduleRequestBody, CreateScheduleRequestBody, ListSchedulesResponseBody,
    ScheduleResponseBody, UpdateScheduleStatusRequestBody,
};
use crate::inbound::http::schemas::{DeliveryStatsSchema, ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the authentication front end.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Meal delivery scheduling API",
        description = "HTTP interface for recurring meal-plan delivery schedules, \
                       delivery statistics, and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::schedules::create_schedule,
        crate::inbound::http::schedules::list_schedules,
        crate::inbound::http::schedules::get_delivery_stats,
        crate::inbound::http::schedules::get_schedule,
        crate::inbound::http::schedules::update_schedule_status,
        crate::inbound::http::schedules::advance_schedule,
        crate::inbound::http::schedules::delete_schedule,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DeliveryStatsSchema,
        CreateScheduleRequestBody,
        UpdateScheduleStatusRequestBody,
        AdvanceScheduleRequestBody,
        ScheduleResponseBody,
        ListSchedulesResponseBody,
    )),
    tags(
        (name = "schedules", description = "Operations on recurring delivery schedules"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const STATS_SCHEMA_NAME: &str = "crate.domain.DeliveryStats";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_stats_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let stats_schema = schemas.get(STATS_SCHEMA_NAME).expect("DeliveryStats schema");

        assert_object_schema_has_field(stats_schema, "totalSchedules");
        assert_object_schema_has_field(stats_schema, "upcomingDeliveries");
    }

    #[test]
    fn openapi_registers_all_schedule_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/schedules",
            "/api/v1/schedules/stats",
            "/api/v1/schedules/{id}",
            "/api/v1/schedules/{id}/status",
            "/api/v1/schedules/{id}/advance",
        ] {
            assert!(paths.contains_key(path), "expected path '{path}'");
        }
    }
}
