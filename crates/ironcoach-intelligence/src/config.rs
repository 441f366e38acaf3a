// ABOUTME: Tunable thresholds for the intelligence analyzers with environment overrides
// ABOUTME: Defaults come from the constant tables; validate() rejects out-of-range values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::env;
use std::str::FromStr;

use ironcoach_core::errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{fatigue, load, periodization, plateau, progression};

/// Shortest trailing analysis window accepted
pub const MIN_WINDOW_WEEKS: u32 = 4;
/// Longest trailing analysis window accepted
pub const MAX_WINDOW_WEEKS: u32 = 12;
/// Default trailing analysis window
pub const DEFAULT_WINDOW_WEEKS: u32 = 8;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("Invalid value '{value}' for {variable}")]
    InvalidValue {
        /// Variable name
        variable: &'static str,
        /// Raw value
        value: String,
    },

    /// A value parsed but failed validation
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}

/// Training context aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Trailing window in weeks
    pub window_weeks: u32,
    /// Trailing acute window in days
    pub acute_window_days: i64,
    /// Average session volume above which the intensity multiplier is raised
    pub high_volume_threshold: f64,
}

/// Fatigue pattern thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueConfig {
    /// Sessions needed before any pattern is evaluated
    pub min_sessions: usize,
    /// Last-3 vs previous-3 volume drop for acute fatigue
    pub acute_volume_drop: f64,
    /// Last-8 vs previous-8 volume drop for chronic fatigue
    pub chronic_volume_drop: f64,
    /// Session-to-session drop for a recovery stall
    pub recovery_stall_drop: f64,
    /// Normalized slope for performance decline
    pub decline_normalized_slope: f64,
    /// Gap coefficient of variation for inconsistent recovery
    pub inconsistent_recovery_cv: f64,
}

/// Periodization cycle reconstruction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodizationConfig {
    /// Weekly volume tolerance around the latest week
    pub block_volume_tolerance: f64,
    /// Share of the window mean below which a week is a deload week
    pub deload_week_volume_ratio: f64,
}

/// Progression recommendation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Rounding increment for suggested weights
    pub weight_quantum: f64,
    /// Best-volume improvement under which a session pair is stalled
    pub plateau_improvement_threshold: f64,
}

/// Plateau analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateauConfig {
    /// Analysis window in weeks
    pub window_weeks: u32,
    /// Data points a factor needs before it reports a severity
    pub min_data_points: usize,
}

/// Complete intelligence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Training context aggregation
    pub context: ContextConfig,
    /// Fatigue pattern detection
    pub fatigue: FatigueConfig,
    /// Periodization
    pub periodization: PeriodizationConfig,
    /// Progression
    pub progression: ProgressionConfig,
    /// Plateau analysis
    pub plateau: PlateauConfig,
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self {
            context: ContextConfig {
                window_weeks: DEFAULT_WINDOW_WEEKS,
                acute_window_days: load::ACUTE_WINDOW_DAYS,
                high_volume_threshold: load::HIGH_VOLUME_SESSION_THRESHOLD,
            },
            fatigue: FatigueConfig {
                min_sessions: fatigue::MIN_SESSIONS_FOR_PATTERNS,
                acute_volume_drop: fatigue::ACUTE_VOLUME_DROP,
                chronic_volume_drop: fatigue::CHRONIC_VOLUME_DROP,
                recovery_stall_drop: fatigue::RECOVERY_STALL_DROP,
                decline_normalized_slope: fatigue::DECLINE_NORMALIZED_SLOPE,
                inconsistent_recovery_cv: fatigue::INCONSISTENT_RECOVERY_CV,
            },
            periodization: PeriodizationConfig {
                block_volume_tolerance: periodization::BLOCK_VOLUME_TOLERANCE,
                deload_week_volume_ratio: periodization::DELOAD_WEEK_VOLUME_RATIO,
            },
            progression: ProgressionConfig {
                weight_quantum: progression::WEIGHT_QUANTUM,
                plateau_improvement_threshold: progression::PLATEAU_IMPROVEMENT_THRESHOLD,
            },
            plateau: PlateauConfig {
                window_weeks: plateau::WINDOW_WEEKS,
                min_data_points: plateau::MIN_DATA_POINTS,
            },
        }
    }
}

fn env_override<T: FromStr>(variable: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { variable, value }),
        Err(_) => Ok(None),
    }
}

fn require_fraction(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "{name} must be between 0 and 1 (exclusive), got {value}"
        )))
    }
}

impl IntelligenceConfig {
    /// Load configuration from environment variables with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails validation
    pub fn from_environment() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(weeks) = env_override("IRONCOACH_WINDOW_WEEKS")? {
            config.context.window_weeks = weeks;
        }
        if let Some(weeks) = env_override("IRONCOACH_PLATEAU_WINDOW_WEEKS")? {
            config.plateau.window_weeks = weeks;
        }
        if let Some(quantum) = env_override("IRONCOACH_WEIGHT_QUANTUM")? {
            config.progression.weight_quantum = quantum;
        }
        if let Some(drop) = env_override("IRONCOACH_ACUTE_FATIGUE_DROP")? {
            config.fatigue.acute_volume_drop = drop;
        }
        if let Some(drop) = env_override("IRONCOACH_CHRONIC_FATIGUE_DROP")? {
            config.fatigue.chronic_volume_drop = drop;
        }
        if let Some(drop) = env_override("IRONCOACH_RECOVERY_STALL_DROP")? {
            config.fatigue.recovery_stall_drop = drop;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is outside its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WINDOW_WEEKS..=MAX_WINDOW_WEEKS).contains(&self.context.window_weeks) {
            return Err(ConfigError::ValidationFailed(format!(
                "window_weeks must be between {MIN_WINDOW_WEEKS} and {MAX_WINDOW_WEEKS}, got {}",
                self.context.window_weeks
            )));
        }

        if self.context.acute_window_days < 7
            || self.context.acute_window_days > i64::from(self.context.window_weeks) * 7
        {
            return Err(ConfigError::ValidationFailed(
                "acute_window_days must be at least 7 and fit inside the window".into(),
            ));
        }

        if self.context.high_volume_threshold <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "high_volume_threshold must be > 0".into(),
            ));
        }

        if self.fatigue.min_sessions < 2 * fatigue::ACUTE_BLOCK_SESSIONS {
            return Err(ConfigError::ValidationFailed(format!(
                "fatigue min_sessions must be >= {}",
                2 * fatigue::ACUTE_BLOCK_SESSIONS
            )));
        }

        require_fraction("acute_volume_drop", self.fatigue.acute_volume_drop)?;
        require_fraction("chronic_volume_drop", self.fatigue.chronic_volume_drop)?;
        require_fraction("recovery_stall_drop", self.fatigue.recovery_stall_drop)?;
        require_fraction(
            "decline_normalized_slope",
            self.fatigue.decline_normalized_slope,
        )?;

        if self.fatigue.inconsistent_recovery_cv <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "inconsistent_recovery_cv must be > 0".into(),
            ));
        }

        require_fraction(
            "block_volume_tolerance",
            self.periodization.block_volume_tolerance,
        )?;
        require_fraction(
            "deload_week_volume_ratio",
            self.periodization.deload_week_volume_ratio,
        )?;

        let quantum = self.progression.weight_quantum;
        if !quantum.is_finite() || quantum <= 0.0 || quantum > 10.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "weight_quantum must be in (0, 10], got {quantum}"
            )));
        }

        require_fraction(
            "plateau_improvement_threshold",
            self.progression.plateau_improvement_threshold,
        )?;

        let min_plateau_weeks = 2 * plateau::VOLUME_BLOCK_WEEKS;
        if i64::from(self.plateau.window_weeks) < min_plateau_weeks {
            return Err(ConfigError::ValidationFailed(format!(
                "plateau window_weeks must be >= {min_plateau_weeks}, got {}",
                self.plateau.window_weeks
            )));
        }

        if self.plateau.min_data_points < 2 {
            return Err(ConfigError::ValidationFailed(
                "plateau min_data_points must be >= 2".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(IntelligenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_window_outside_range_is_rejected() {
        let mut config = IntelligenceConfig::default();
        config.context.window_weeks = 3;
        assert!(config.validate().is_err());
        config.context.window_weeks = 13;
        assert!(config.validate().is_err());
        config.context.window_weeks = 12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_quantum_is_rejected() {
        let mut config = IntelligenceConfig::default();
        config.progression.weight_quantum = 0.0;
        assert!(config.validate().is_err());
    }
}
