//! Port for upcoming-delivery notification dispatch.
//!
//! The core only supplies computed dates; how a reminder reaches the client
//! (email, SMS) is an external collaborator's concern. Notification failures
//! are surfaced to the service layer, which logs them without failing the
//! schedule mutation that produced the date.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised by notifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryNotifierError {
    /// The reminder could not be handed to the dispatch channel.
    #[error("delivery reminder dispatch failed: {message}")]
    Dispatch { message: String },
}

impl DeliveryNotifierError {
    /// Create a dispatch error with the given message.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }
}

/// Reminder for one upcoming delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReminder {
    pub schedule_id: Uuid,
    pub client_id: Uuid,
    pub deliver_on: NaiveDate,
    pub deliver_at: NaiveTime,
    /// Days before `deliver_on` the client should be notified.
    pub lead_days: i32,
}

/// Port for scheduling an upcoming-delivery reminder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryNotifier: Send + Sync {
    /// Hand a reminder to the external dispatch channel.
    async fn schedule_reminder(
        &self,
        reminder: DeliveryReminder,
    ) -> Result<(), DeliveryNotifierError>;
}

/// Notifier that drops reminders, for tests and notification-disabled runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDeliveryNotifier;

#[async_trait]
impl DeliveryNotifier for NoOpDeliveryNotifier {
    async fn schedule_reminder(
        &self,
        _reminder: DeliveryReminder,
    ) -> Result<(), DeliveryNotifierError> {
        Ok(())
    }
}
