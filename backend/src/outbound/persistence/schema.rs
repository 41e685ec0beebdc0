//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Recurring delivery schedules table.
    ///
    /// One row per meal-plan delivery schedule owned by a practitioner. The
    /// `version` column backs the compare-and-swap writes used for status and
    /// advancement updates.
    schedules (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning practitioner.
        practitioner_id -> Uuid,
        /// Client the meal plan is delivered to.
        client_id -> Uuid,
        /// Meal plan being delivered.
        meal_plan_id -> Uuid,
        /// Human-readable schedule name.
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// First date deliveries may occur on.
        start_date -> Date,
        /// Optional final date deliveries may occur on.
        end_date -> Nullable<Date>,
        /// Recurrence frequency label (kebab-case).
        frequency -> Varchar,
        /// Weekday indices for weekly frequencies (0 = Sunday).
        delivery_days -> Array<Int2>,
        /// Time of day deliveries are made.
        delivery_time -> Time,
        /// Whether the next delivery is computed automatically on advance.
        auto_generate_next -> Bool,
        /// Whether delivery reminders are dispatched.
        notification_enabled -> Bool,
        /// How many days before a delivery to send the reminder.
        notification_days_before -> Int4,
        /// Next planned delivery date, absent once the schedule is exhausted.
        next_delivery_date -> Nullable<Date>,
        /// Count of deliveries recorded so far.
        total_deliveries -> Int8,
        /// Lifecycle status label (snake_case).
        status -> Varchar,
        /// Optimistic concurrency token, incremented on every write.
        version -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-delivery history table.
    ///
    /// One row per recorded delivery occurrence. Rows are removed with their
    /// parent schedule via `ON DELETE CASCADE`.
    delivery_logs (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Parent schedule.
        schedule_id -> Uuid,
        /// Date the delivery occurred on.
        delivery_date -> Date,
        /// When the delivery was marked sent, null while pending.
        sent_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(delivery_logs -> schedules (schedule_id));

diesel::allow_tables_to_appear_in_same_query!(schedules, delivery_logs);
