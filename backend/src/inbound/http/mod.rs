//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod rate_limit;
pub mod schedules;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
