//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{delivery_logs, schedules};

/// Row struct for reading from the schedules table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
    pub meal_plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: String,
    pub delivery_days: Vec<i16>,
    pub delivery_time: NaiveTime,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    pub next_delivery_date: Option<NaiveDate>,
    pub total_deliveries: i64,
    pub status: String,
    pub version: i64,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new schedule records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub(crate) struct NewScheduleRow<'a> {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub client_id: Uuid,
    pub meal_plan_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: &'a str,
    pub delivery_days: &'a [i16],
    pub delivery_time: NaiveTime,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    pub next_delivery_date: Option<NaiveDate>,
    pub total_deliveries: i64,
    pub status: &'a str,
    pub version: i64,
}

/// Changeset struct for version-checked schedule updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schedules)]
pub(crate) struct ScheduleUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: &'a str,
    pub delivery_days: &'a [i16],
    pub delivery_time: NaiveTime,
    pub auto_generate_next: bool,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    pub next_delivery_date: Option<NaiveDate>,
    pub total_deliveries: i64,
    pub status: &'a str,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for recording delivery occurrences.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = delivery_logs)]
pub(crate) struct NewDeliveryLogRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub delivery_date: NaiveDate,
    pub sent_at: Option<DateTime<Utc>>,
}
