//! Schedule lifecycle status and transition rules.
//!
//! All transitions are practitioner-initiated; there is no autonomous timer
//! moving schedules between states. Completed and cancelled are terminal:
//! requests to leave them are rejected rather than silently accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScheduleValidationError;

/// Lifecycle state of a delivery schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    /// Whether no further transition can leave this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a transition to `target` is permitted.
    ///
    /// Active and paused are mutually reversible; completion is only reached
    /// from active; cancellation is reachable from any non-terminal status.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Active, Self::Paused)
            | (Self::Paused, Self::Active)
            | (Self::Active, Self::Completed) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Validate and apply a transition, returning the new status.
    pub fn transition_to(self, target: Self) -> Result<Self, ScheduleValidationError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(ScheduleValidationError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }

    /// Human-readable label shown by UI layers.
    ///
    /// Owned here so views never re-implement the mapping.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Paused => f.write_str("paused"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Error returned when parsing a schedule status from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseScheduleStatusError;

impl fmt::Display for ParseScheduleStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid schedule status")
    }
}

impl std::error::Error for ParseScheduleStatusError {}

impl FromStr for ScheduleStatus {
    type Err = ParseScheduleStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseScheduleStatusError),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the status state machine.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ScheduleStatus::Active, ScheduleStatus::Paused, true)]
    #[case(ScheduleStatus::Active, ScheduleStatus::Completed, true)]
    #[case(ScheduleStatus::Active, ScheduleStatus::Cancelled, true)]
    #[case(ScheduleStatus::Paused, ScheduleStatus::Active, true)]
    #[case(ScheduleStatus::Paused, ScheduleStatus::Cancelled, true)]
    #[case(ScheduleStatus::Paused, ScheduleStatus::Completed, false)]
    #[case(ScheduleStatus::Active, ScheduleStatus::Active, false)]
    fn non_terminal_transition_matrix(
        #[case] from: ScheduleStatus,
        #[case] to: ScheduleStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case(ScheduleStatus::Completed)]
    #[case(ScheduleStatus::Cancelled)]
    fn terminal_statuses_admit_no_transition(#[case] from: ScheduleStatus) {
        for target in [
            ScheduleStatus::Active,
            ScheduleStatus::Paused,
            ScheduleStatus::Completed,
            ScheduleStatus::Cancelled,
        ] {
            assert!(!from.can_transition_to(target));
            assert_eq!(
                from.transition_to(target),
                Err(ScheduleValidationError::InvalidTransition { from, to: target })
            );
        }
    }

    #[rstest]
    fn transition_to_returns_the_target() {
        let next = ScheduleStatus::Active
            .transition_to(ScheduleStatus::Paused)
            .expect("valid transition");
        assert_eq!(next, ScheduleStatus::Paused);
    }

    #[rstest]
    #[case("active", ScheduleStatus::Active)]
    #[case("paused", ScheduleStatus::Paused)]
    #[case("completed", ScheduleStatus::Completed)]
    #[case("cancelled", ScheduleStatus::Cancelled)]
    fn status_round_trips_through_strings(#[case] raw: &str, #[case] expected: ScheduleStatus) {
        let parsed: ScheduleStatus = raw.parse().expect("valid status");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), raw);
    }
}
