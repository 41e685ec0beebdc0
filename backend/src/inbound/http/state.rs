//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureScheduleCommand, FixtureScheduleQuery, ScheduleCommand, ScheduleQuery,
};
use crate::inbound::http::rate_limit::RateLimiter;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub schedules: Arc<dyn ScheduleCommand>,
    pub schedules_query: Arc<dyn ScheduleQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            schedules: Arc::new(FixtureScheduleCommand),
            schedules_query: Arc::new(FixtureScheduleQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub schedules: Arc<dyn ScheduleCommand>,
    pub schedules_query: Arc<dyn ScheduleQuery>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, Arc::new(RateLimiter::default()))
    }
}

impl HttpState {
    /// Construct state from a ports bundle and an injected rate limiter.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::rate_limit::RateLimiter;
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default(), Arc::new(RateLimiter::default()));
    /// let _schedules = state.schedules.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, rate_limiter: Arc<RateLimiter>) -> Self {
        let HttpStatePorts {
            schedules,
            schedules_query,
        } = ports;
        Self {
            schedules,
            schedules_query,
            rate_limiter,
        }
    }
}
