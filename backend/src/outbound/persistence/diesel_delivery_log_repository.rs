//! PostgreSQL-backed `DeliveryLogRepository` implementation using Diesel ORM.
//!
//! The log table carries no practitioner column of its own; aggregate counts
//! join through the parent schedule to stay scoped to the owning tenant.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryLogRepository, DeliveryLogRepositoryError};
use crate::domain::{DeliveryLogEntry, PractitionerId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewDeliveryLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::{delivery_logs, schedules};

/// Diesel-backed implementation of the delivery-log repository port.
#[derive(Clone)]
pub struct DieselDeliveryLogRepository {
    pool: DbPool,
}

impl DieselDeliveryLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> DeliveryLogRepositoryError {
    map_basic_pool_error(error, |message| {
        DeliveryLogRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> DeliveryLogRepositoryError {
    map_basic_diesel_error(
        error,
        DeliveryLogRepositoryError::query,
        DeliveryLogRepositoryError::connection,
    )
}

#[async_trait]
impl DeliveryLogRepository for DieselDeliveryLogRepository {
    async fn append(&self, entry: &DeliveryLogEntry) -> Result<(), DeliveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewDeliveryLogRow {
            id: entry.id,
            schedule_id: entry.schedule_id,
            delivery_date: entry.delivery_date,
            sent_at: entry.sent_at,
        };

        diesel::insert_into(delivery_logs::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn count_completed(
        &self,
        practitioner_id: &PractitionerId,
    ) -> Result<i64, DeliveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        delivery_logs::table
            .inner_join(schedules::table)
            .filter(
                schedules::practitioner_id
                    .eq(practitioner_id.as_uuid())
                    .and(delivery_logs::sent_at.is_not_null()),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_between(
        &self,
        practitioner_id: &PractitionerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, DeliveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        delivery_logs::table
            .inner_join(schedules::table)
            .filter(
                schedules::practitioner_id
                    .eq(practitioner_id.as_uuid())
                    .and(delivery_logs::delivery_date.between(start, end)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
