//! Builders for HTTP state ports backed by real or fixture adapters.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::NoOpDeliveryNotifier;
use crate::domain::{ScheduleCommandService, ScheduleQueryService};
use crate::inbound::http::rate_limit::RateLimiter;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{DieselDeliveryLogRepository, DieselScheduleRepository};

use super::ServerConfig;

/// Build the HTTP state from server configuration.
///
/// When a database pool is configured the schedule ports are served by the
/// Diesel repositories; without one the fixture implementations are used so
/// the server can still boot for smoke tests.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    rate_limiter: Arc<RateLimiter>,
) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            let schedule_repo = Arc::new(DieselScheduleRepository::new(pool.clone()));
            let delivery_log_repo = Arc::new(DieselDeliveryLogRepository::new(pool.clone()));
            let notifier = Arc::new(NoOpDeliveryNotifier);

            HttpStatePorts {
                schedules: Arc::new(ScheduleCommandService::new(
                    Arc::clone(&schedule_repo),
                    Arc::clone(&delivery_log_repo),
                    notifier,
                )),
                schedules_query: Arc::new(ScheduleQueryService::new(
                    schedule_repo,
                    delivery_log_repo,
                )),
            }
        }
        None => HttpStatePorts::default(),
    };

    web::Data::new(HttpState::new(ports, rate_limiter))
}
