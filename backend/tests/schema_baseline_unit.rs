//! Contract checks for the SQL migrations.
//!
//! These tests pin the DDL fragments the Rust schema definitions rely on, so
//! a migration edit that would desynchronise `schema.rs` fails fast without a
//! live database.

use rstest::rstest;

const SCHEDULES_UP: &str = include_str!("../migrations/2026-08-20-000000_create_schedules/up.sql");
const SCHEDULES_DOWN: &str =
    include_str!("../migrations/2026-08-20-000000_create_schedules/down.sql");
const DELIVERY_LOGS_UP: &str =
    include_str!("../migrations/2026-08-20-000100_create_delivery_logs/up.sql");
const DELIVERY_LOGS_DOWN: &str =
    include_str!("../migrations/2026-08-20-000100_create_delivery_logs/down.sql");

#[rstest]
fn schedules_migration_enables_pgcrypto() {
    assert!(SCHEDULES_UP.contains("CREATE EXTENSION IF NOT EXISTS pgcrypto;"));
}

#[rstest]
#[case("CREATE TABLE schedules")]
#[case("practitioner_id UUID NOT NULL")]
#[case("delivery_days SMALLINT[] NOT NULL")]
#[case("version BIGINT NOT NULL DEFAULT 0")]
#[case("CHECK (frequency IN ('daily', 'weekly', 'bi-weekly', 'monthly'))")]
#[case("CHECK (status IN ('active', 'paused', 'completed', 'cancelled'))")]
#[case("CONSTRAINT schedules_dates_valid CHECK (end_date IS NULL OR end_date >= start_date)")]
fn creates_schedules_contract(#[case] ddl_fragment: &str) {
    assert!(
        SCHEDULES_UP.contains(ddl_fragment),
        "expected schedules migration to contain: {ddl_fragment}"
    );
}

#[rstest]
#[case("idx_schedules_practitioner")]
#[case("idx_schedules_practitioner_status")]
fn creates_schedules_indexes(#[case] index_fragment: &str) {
    assert!(
        SCHEDULES_UP.contains(index_fragment),
        "expected schedules migration to contain: {index_fragment}"
    );
}

#[rstest]
fn schedules_updated_at_is_trigger_maintained() {
    assert!(SCHEDULES_UP.contains("CREATE TRIGGER schedules_set_updated_at"));
    assert!(SCHEDULES_DOWN.contains("DROP TRIGGER IF EXISTS schedules_set_updated_at"));
}

#[rstest]
#[case("CREATE TABLE delivery_logs")]
#[case("REFERENCES schedules (id) ON DELETE CASCADE")]
#[case("sent_at TIMESTAMPTZ")]
#[case("idx_delivery_logs_schedule")]
fn creates_delivery_logs_contract(#[case] ddl_fragment: &str) {
    assert!(
        DELIVERY_LOGS_UP.contains(ddl_fragment),
        "expected delivery_logs migration to contain: {ddl_fragment}"
    );
}

#[rstest]
fn down_migrations_drop_their_tables() {
    assert!(SCHEDULES_DOWN.contains("DROP TABLE IF EXISTS schedules;"));
    assert!(DELIVERY_LOGS_DOWN.contains("DROP TABLE IF EXISTS delivery_logs;"));
}
