// ABOUTME: Strongly typed identifiers for athletes, exercises and workout sessions
// ABOUTME: Parsing rejects empty or malformed identifiers with InvalidInput errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Maximum accepted length for textual identifiers
const MAX_TEXT_ID_LEN: usize = 128;

/// Athlete identifier (UUID assigned by the hosted backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AthleteId(pub Uuid);

impl AthleteId {
    /// Create a new random `AthleteId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `AthleteId` from a UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse a caller-supplied athlete identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the value is empty, not a UUID, or the nil UUID
    pub fn parse(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("athlete id must not be empty"));
        }
        let uuid = Uuid::parse_str(trimmed).map_err(|e| {
            AppError::invalid_input(format!("athlete id '{trimmed}' is not a valid UUID"))
                .with_source(e)
        })?;
        if uuid.is_nil() {
            return Err(AppError::invalid_input("athlete id must not be the nil UUID"));
        }
        Ok(Self(uuid))
    }
}

impl Default for AthleteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AthleteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AthleteId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_text_id(kind: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{kind} must not be empty")));
    }
    if trimmed.len() > MAX_TEXT_ID_LEN {
        return Err(AppError::invalid_input(format!(
            "{kind} exceeds {MAX_TEXT_ID_LEN} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(AppError::invalid_input(format!(
            "{kind} contains control characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Exercise catalog identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(String);

impl ExerciseId {
    /// Parse a caller-supplied exercise identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the value is empty, too long or contains control characters
    pub fn parse(value: &str) -> AppResult<Self> {
        validate_text_id("exercise id", value).map(Self)
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExerciseId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Workout session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Parse a session identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the value is empty, too long or contains control characters
    pub fn parse(value: &str) -> AppResult<Self> {
        validate_text_id("session id", value).map(Self)
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_athlete_id_rejects_malformed_values() {
        for raw in ["", "   ", "not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
            let err = AthleteId::parse(raw).err();
            assert_eq!(err.map(|e| e.code), Some(ErrorCode::InvalidInput), "{raw}");
        }
    }

    #[test]
    fn test_athlete_id_round_trips_display() {
        let id = AthleteId::new();
        assert_eq!(AthleteId::parse(&id.to_string()).ok(), Some(id));
    }

    #[test]
    fn test_exercise_id_trims_and_validates() {
        assert_eq!(
            ExerciseId::parse("  bench-press ").map(|id| id.as_str().to_owned()).ok(),
            Some("bench-press".to_owned())
        );
        assert!(ExerciseId::parse("").is_err());
        assert!(ExerciseId::parse("squat\u{0}").is_err());
        assert!(ExerciseId::parse(&"x".repeat(200)).is_err());
    }
}
