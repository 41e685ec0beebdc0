//! Practitioner identity primitives.
//!
//! A practitioner is the authenticated owner of schedules and their delivery
//! logs. Every repository read and write is scoped to a practitioner id so a
//! practitioner can never observe another tenant's rows.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by [`PractitionerId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PractitionerValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for PractitionerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "practitioner id must not be empty"),
            Self::InvalidId => write!(f, "practitioner id must be a UUID"),
        }
    }
}

impl std::error::Error for PractitionerValidationError {}

/// Stable practitioner identifier backed by a UUID.
///
/// The raw string form is retained so session round-trips preserve the exact
/// representation the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PractitionerId(Uuid, String);

impl PractitionerId {
    /// Validate and construct a [`PractitionerId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PractitionerValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Construct an id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`PractitionerId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, PractitionerValidationError> {
        if id.is_empty() {
            return Err(PractitionerValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PractitionerValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| PractitionerValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for PractitionerId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for PractitionerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PractitionerId> for String {
    fn from(value: PractitionerId) -> Self {
        let PractitionerId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for PractitionerId {
    type Error = PractitionerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn accepts_canonical_uuid_strings() {
        let id = PractitionerId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .expect("valid practitioner id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("", PractitionerValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", PractitionerValidationError::InvalidId)]
    #[case("not-a-uuid", PractitionerValidationError::InvalidId)]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: PractitionerValidationError) {
        assert_eq!(PractitionerId::new(raw), Err(expected));
    }

    #[rstest]
    fn random_ids_round_trip_through_string() {
        let id = PractitionerId::random();
        let restored = PractitionerId::new(id.as_ref()).expect("round trip");
        assert_eq!(restored, id);
    }
}
