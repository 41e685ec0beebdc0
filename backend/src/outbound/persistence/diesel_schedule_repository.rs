//! PostgreSQL-backed `ScheduleRepository` implementation using Diesel ORM.
//!
//! This adapter persists schedules and rehydrates them through validated
//! domain constructors. Updates go through a version-checked `UPDATE` so
//! concurrent writers cannot clobber each other.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::{PractitionerId, Schedule, ScheduleRecord, ScheduleStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewScheduleRow, ScheduleRow, ScheduleUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::schedules;

/// Diesel-backed implementation of the schedule repository port.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ScheduleRepositoryError {
    map_basic_pool_error(error, |message| {
        ScheduleRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ScheduleRepositoryError {
    map_basic_diesel_error(
        error,
        ScheduleRepositoryError::query,
        ScheduleRepositoryError::connection,
    )
}

/// Widen the domain's weekday indices to the stored `smallint` form.
fn encode_delivery_days(schedule: &Schedule) -> Vec<i16> {
    schedule
        .delivery_days()
        .as_slice()
        .iter()
        .map(|day| i16::from(*day))
        .collect()
}

/// Narrow stored weekday indices back to the domain's `u8` form.
fn decode_delivery_days(days: Vec<i16>) -> Result<Vec<u8>, ScheduleRepositoryError> {
    days.into_iter()
        .map(|day| {
            u8::try_from(day).map_err(|_| {
                ScheduleRepositoryError::query(format!("delivery day {day} out of range"))
            })
        })
        .collect()
}

/// Convert a database row into a validated domain schedule.
fn row_to_schedule(row: ScheduleRow) -> Result<Schedule, ScheduleRepositoryError> {
    let ScheduleRow {
        id,
        practitioner_id,
        client_id,
        meal_plan_id,
        name,
        description,
        start_date,
        end_date,
        frequency,
        delivery_days,
        delivery_time,
        auto_generate_next,
        notification_enabled,
        notification_days_before,
        next_delivery_date,
        total_deliveries,
        status,
        version,
        created_at: _,
        updated_at: _,
    } = row;

    let frequency = frequency
        .parse()
        .map_err(|_| ScheduleRepositoryError::query(format!("unknown frequency '{frequency}'")))?;
    let status: ScheduleStatus = status
        .parse()
        .map_err(|_| ScheduleRepositoryError::query(format!("unknown status '{status}'")))?;
    let delivery_days = decode_delivery_days(delivery_days)?;

    Schedule::from_record(ScheduleRecord {
        id,
        practitioner_id: PractitionerId::from_uuid(practitioner_id),
        client_id,
        meal_plan_id,
        name,
        description,
        start_date,
        end_date,
        frequency,
        delivery_days,
        delivery_time,
        auto_generate_next,
        notification_enabled,
        notification_days_before,
        next_delivery_date,
        total_deliveries,
        status,
        version,
    })
    .map_err(|err| ScheduleRepositoryError::query(err.to_string()))
}

#[async_trait]
impl ScheduleRepository for DieselScheduleRepository {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let frequency = schedule.frequency().to_string();
        let status = schedule.status().to_string();
        let delivery_days = encode_delivery_days(schedule);

        let new_row = NewScheduleRow {
            id: schedule.id(),
            practitioner_id: *schedule.practitioner_id().as_uuid(),
            client_id: schedule.client_id(),
            meal_plan_id: schedule.meal_plan_id(),
            name: schedule.name(),
            description: schedule.description(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
            frequency: &frequency,
            delivery_days: &delivery_days,
            delivery_time: schedule.delivery_time(),
            auto_generate_next: schedule.auto_generate_next(),
            notification_enabled: schedule.notification_enabled(),
            notification_days_before: schedule.notification_days_before(),
            next_delivery_date: schedule.next_delivery_date(),
            total_deliveries: schedule.total_deliveries(),
            status: &status,
            version: schedule.version(),
        };

        diesel::insert_into(schedules::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
        schedule_id: &Uuid,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = schedules::table
            .filter(
                schedules::id
                    .eq(schedule_id)
                    .and(schedules::practitioner_id.eq(practitioner_id.as_uuid())),
            )
            .select(ScheduleRow::as_select())
            .first::<ScheduleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_schedule).transpose()
    }

    async fn list_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ScheduleRow> = schedules::table
            .filter(schedules::practitioner_id.eq(practitioner_id.as_uuid()))
            .order((schedules::created_at.desc(), schedules::id.desc()))
            .select(ScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn update_if_version(
        &self,
        schedule: &Schedule,
        expected_version: i64,
    ) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let frequency = schedule.frequency().to_string();
        let status = schedule.status().to_string();
        let delivery_days = encode_delivery_days(schedule);

        let update_row = ScheduleUpdate {
            name: schedule.name(),
            description: schedule.description(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
            frequency: &frequency,
            delivery_days: &delivery_days,
            delivery_time: schedule.delivery_time(),
            auto_generate_next: schedule.auto_generate_next(),
            notification_enabled: schedule.notification_enabled(),
            notification_days_before: schedule.notification_days_before(),
            next_delivery_date: schedule.next_delivery_date(),
            total_deliveries: schedule.total_deliveries(),
            status: &status,
            version: expected_version + 1,
            updated_at: Utc::now(),
        };

        let affected = diesel::update(
            schedules::table.filter(
                schedules::id
                    .eq(schedule.id())
                    .and(schedules::practitioner_id.eq(schedule.practitioner_id().as_uuid()))
                    .and(schedules::version.eq(expected_version)),
            ),
        )
        .set(&update_row)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected == 1)
    }

    async fn delete_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
        schedule_id: &Uuid,
    ) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            schedules::table.filter(
                schedules::id
                    .eq(schedule_id)
                    .and(schedules::practitioner_id.eq(practitioner_id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected == 1)
    }

    async fn count_schedules(
        &self,
        practitioner_id: &PractitionerId,
    ) -> Result<i64, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        schedules::table
            .filter(schedules::practitioner_id.eq(practitioner_id.as_uuid()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_with_status(
        &self,
        practitioner_id: &PractitionerId,
        status: ScheduleStatus,
    ) -> Result<i64, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        schedules::table
            .filter(
                schedules::practitioner_id
                    .eq(practitioner_id.as_uuid())
                    .and(schedules::status.eq(status.to_string())),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_upcoming(
        &self,
        practitioner_id: &PractitionerId,
        today: NaiveDate,
    ) -> Result<i64, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        schedules::table
            .filter(
                schedules::practitioner_id
                    .eq(practitioner_id.as_uuid())
                    .and(schedules::status.eq(ScheduleStatus::Active.to_string()))
                    .and(schedules::next_delivery_date.ge(today)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
