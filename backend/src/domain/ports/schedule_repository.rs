//! Port for schedule persistence.
//!
//! All reads and writes are scoped to the owning practitioner so an adapter
//! can never leak another tenant's schedules. Updates are conditional on the
//! schedule's version token: a stale write returns `Ok(false)` instead of
//! silently overwriting a concurrent advance.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{PractitionerId, Schedule, ScheduleStatus};

/// Errors raised by schedule repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleRepositoryError {
    /// Repository connection could not be established.
    #[error("schedule repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("schedule repository query failed: {message}")]
    Query { message: String },
}

impl ScheduleRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for schedule reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Persist a newly created schedule.
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError>;

    /// Find a schedule by id, scoped to its owning practitioner.
    async fn find_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
        schedule_id: &Uuid,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError>;

    /// List all schedules owned by a practitioner, newest first.
    async fn list_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError>;

    /// Write the schedule's current state when the stored version still
    /// matches `expected_version`, bumping the version on success.
    ///
    /// Returns `Ok(false)` when the row was concurrently modified or removed.
    async fn update_if_version(
        &self,
        schedule: &Schedule,
        expected_version: i64,
    ) -> Result<bool, ScheduleRepositoryError>;

    /// Delete a schedule and (via cascade) its delivery-log rows.
    ///
    /// Returns `Ok(false)` when no owned row matched.
    async fn delete_for_practitioner(
        &self,
        practitioner_id: &PractitionerId,
        schedule_id: &Uuid,
    ) -> Result<bool, ScheduleRepositoryError>;

    /// Count all schedules owned by a practitioner.
    async fn count_schedules(
        &self,
        practitioner_id: &PractitionerId,
    ) -> Result<i64, ScheduleRepositoryError>;

    /// Count schedules in the given status.
    async fn count_with_status(
        &self,
        practitioner_id: &PractitionerId,
        status: ScheduleStatus,
    ) -> Result<i64, ScheduleRepositoryError>;

    /// Count schedules whose next delivery date is on or after `today`.
    async fn count_upcoming(
        &self,
        practitioner_id: &PractitionerId,
        today: NaiveDate,
    ) -> Result<i64, ScheduleRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScheduleRepository;

#[async_trait]
impl ScheduleRepository for FixtureScheduleRepository {
    async fn insert(&self, _schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        Ok(())
    }

    async fn find_for_practitioner(
        &self,
        _practitioner_id: &PractitionerId,
        _schedule_id: &Uuid,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        Ok(None)
    }

    async fn list_for_practitioner(
        &self,
        _practitioner_id: &PractitionerId,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_if_version(
        &self,
        _schedule: &Schedule,
        _expected_version: i64,
    ) -> Result<bool, ScheduleRepositoryError> {
        Ok(true)
    }

    async fn delete_for_practitioner(
        &self,
        _practitioner_id: &PractitionerId,
        _schedule_id: &Uuid,
    ) -> Result<bool, ScheduleRepositoryError> {
        Ok(false)
    }

    async fn count_schedules(
        &self,
        _practitioner_id: &PractitionerId,
    ) -> Result<i64, ScheduleRepositoryError> {
        Ok(0)
    }

    async fn count_with_status(
        &self,
        _practitioner_id: &PractitionerId,
        _status: ScheduleStatus,
    ) -> Result<i64, ScheduleRepositoryError> {
        Ok(0)
    }

    async fn count_upcoming(
        &self,
        _practitioner_id: &PractitionerId,
        _today: NaiveDate,
    ) -> Result<i64, ScheduleRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_find_returns_none() {
        let repo = FixtureScheduleRepository;
        let found = repo
            .find_for_practitioner(&PractitionerId::random(), &Uuid::new_v4())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_counts_are_zero() {
        let repo = FixtureScheduleRepository;
        let practitioner = PractitionerId::random();
        assert_eq!(
            repo.count_schedules(&practitioner).await.expect("count"),
            0
        );
        assert_eq!(
            repo.count_with_status(&practitioner, ScheduleStatus::Active)
                .await
                .expect("count"),
            0
        );
    }

    #[rstest]
    fn error_constructors_format_messages() {
        let err = ScheduleRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));

        let err = ScheduleRepositoryError::connection("refused");
        assert!(err.to_string().contains("refused"));
    }
}
