// ABOUTME: Environment configuration for the engine: database URL, analyzer thresholds and logging
// ABOUTME: Every field has a default so a bare environment yields a usable local setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use ironcoach_core::errors::{AppError, AppResult};
use ironcoach_intelligence::config::IntelligenceConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::logging::LoggingConfig;

/// Database URL used when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/ironcoach.db";

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for empty or non-SQLite URLs
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL is empty"));
        }
        if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            return Err(AppError::config(
                "only SQLite databases are supported for the training log",
            ));
        }
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Ok(Self::Memory)
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/ironcoach.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Engine configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Training log database
    pub database_url: DatabaseUrl,
    /// Analyzer thresholds
    pub intelligence: IntelligenceConfig,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if `DATABASE_URL` or an `IRONCOACH_*` override is invalid
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let database_url = DatabaseUrl::parse_url(
            &env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
        )?;
        let intelligence = IntelligenceConfig::from_environment()?;
        intelligence.validate()?;

        Ok(Self {
            database_url,
            intelligence,
            logging: LoggingConfig::from_env(),
        })
    }

    /// Log a one-line summary of the effective configuration
    pub fn log_summary(&self) {
        info!(
            database = %self.database_url,
            window_weeks = self.intelligence.context.window_weeks,
            plateau_window_weeks = self.intelligence.plateau.window_weeks,
            weight_quantum = self.intelligence.progression.weight_quantum,
            "Engine configuration loaded"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:").unwrap(), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/lifts.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/lifts.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("./bare.db").unwrap().to_connection_string(),
            "sqlite:./bare.db"
        );
    }

    #[test]
    fn test_rejects_unsupported_urls() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("  ").is_err());
    }
}
