//! Delivery log records.
//!
//! The delivery log is the append-only history of outgoing deliveries. It is
//! written when a schedule advances and consumed by the stats aggregator;
//! rows are removed only by the cascade when their schedule is deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded delivery for a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogEntry {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub delivery_date: NaiveDate,
    /// Set once the delivery was actually dispatched.
    pub sent_at: Option<DateTime<Utc>>,
}

impl DeliveryLogEntry {
    /// Record a dispatched delivery.
    pub fn sent(schedule_id: Uuid, delivery_date: NaiveDate, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_id,
            delivery_date,
            sent_at: Some(sent_at),
        }
    }

    /// Whether the delivery has been dispatched.
    pub fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }
}
