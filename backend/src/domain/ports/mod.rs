//! Domain ports and supporting types for the hexagonal boundary.

mod delivery_log_repository;
mod delivery_notifier;
mod schedule_command;
mod schedule_query;
mod schedule_repository;

#[cfg(test)]
pub use delivery_log_repository::MockDeliveryLogRepository;
pub use delivery_log_repository::{
    DeliveryLogRepository, DeliveryLogRepositoryError, FixtureDeliveryLogRepository,
};
#[cfg(test)]
pub use delivery_notifier::MockDeliveryNotifier;
pub use delivery_notifier::{
    DeliveryNotifier, DeliveryNotifierError, DeliveryReminder, NoOpDeliveryNotifier,
};
#[cfg(test)]
pub use schedule_command::MockScheduleCommand;
pub use schedule_command::{
    AdvanceScheduleRequest, AdvanceScheduleResponse, CreateSchedulePayload, CreateScheduleRequest,
    CreateScheduleResponse, DeleteScheduleRequest, DeleteScheduleResponse, FixtureScheduleCommand,
    ScheduleCommand, SchedulePayload, UpdateScheduleStatusRequest, UpdateScheduleStatusResponse,
};
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
pub use schedule_query::{
    FixtureScheduleQuery, GetDeliveryStatsRequest, GetDeliveryStatsResponse, GetScheduleRequest,
    GetScheduleResponse, ListSchedulesRequest, ListSchedulesResponse, ScheduleQuery,
};
#[cfg(test)]
pub use schedule_repository::MockScheduleRepository;
pub use schedule_repository::{
    FixtureScheduleRepository, ScheduleRepository, ScheduleRepositoryError,
};
