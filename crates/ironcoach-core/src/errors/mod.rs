// ABOUTME: Unified error type and error codes shared by every IronCoach crate
// ABOUTME: Separates invalid input, store outages and configuration faults for callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Unified Error Handling
//!
//! The analytics core only ever fails for three reasons:
//!
//! - **Invalid input**: a missing or malformed athlete/exercise identifier, or an
//!   illegal phase transition requested by a caller.
//! - **Store unavailable**: a collaborator (log store, catalog, profile store)
//!   could not be read. This is kept distinct from "no data yet", which is never
//!   an error and is answered with neutral defaults.
//! - **Configuration**: thresholds that fail validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Malformed identifier, value or phase transition
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // External collaborators (5000-5999)
    /// A log, catalog or profile read failed
    #[serde(rename = "STORE_UNAVAILABLE")]
    StoreUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration failed parsing or validation
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal (9000-9999)
    /// Unexpected failure, including corrupt stored rows
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// JSON encoding or decoding failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::StoreUnavailable => "The training data store is unavailable",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the caller can fix the error by changing its request
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A collaborator read failed
    pub fn store_unavailable(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::StoreUnavailable,
            format!("{}: {}", store.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// True when the failure came from a collaborator rather than from the request
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        self.code == ErrorCode::StoreUnavailable
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::store_unavailable("database", error.to_string()).with_source(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_description_and_message() {
        let error = AppError::invalid_input("athlete id is empty");
        assert_eq!(
            error.to_string(),
            "The provided input is invalid: athlete id is empty"
        );
    }

    #[test]
    fn test_store_unavailable_is_distinct_from_client_errors() {
        let error = AppError::store_unavailable("log store", "connection refused");
        assert!(error.is_store_unavailable());
        assert!(!error.code.is_client_error());
        assert!(ErrorCode::InvalidInput.is_client_error());
    }

    #[test]
    fn test_error_codes_cover_each_failure_kind() {
        let codes = [
            (ErrorCode::InvalidInput, 3000, "\"INVALID_INPUT\""),
            (ErrorCode::StoreUnavailable, 5001, "\"STORE_UNAVAILABLE\""),
            (ErrorCode::ConfigInvalid, 6002, "\"CONFIG_INVALID\""),
            (ErrorCode::InternalError, 9000, "\"INTERNAL_ERROR\""),
            (ErrorCode::SerializationError, 9003, "\"SERIALIZATION_ERROR\""),
        ];
        for (code, number, name) in codes {
            assert_eq!(code as u16, number);
            assert_eq!(serde_json::to_string(&code).unwrap(), name);
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::StoreUnavailable).unwrap();
        assert_eq!(json, "\"STORE_UNAVAILABLE\"");
    }
}
