// ABOUTME: Categorical levels shared by the analyzers: risk, severity, intensity and trends
// ABOUTME: Score-to-bucket mappings live next to the enums they produce
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use serde::{Deserialize, Serialize};

use crate::constants::{fatigue, load, risk};

/// Overtraining risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score below 30
    Low,
    /// Score below 60
    Moderate,
    /// Score below 80
    High,
    /// Score of 80 or more
    Critical,
}

impl RiskLevel {
    /// Bucket a 0-100 risk score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() || score < risk::LOW_THRESHOLD {
            Self::Low
        } else if score < risk::MODERATE_THRESHOLD {
            Self::Moderate
        } else if score < risk::HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// High or critical
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Severity of a detected pattern or plateau factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor
    Low,
    /// Worth acting on
    Moderate,
    /// Needs attention
    High,
    /// Needs immediate action
    Critical,
}

impl Severity {
    /// Band a magnitude against `[moderate, high, critical]` cutoffs
    #[must_use]
    pub fn from_bands(magnitude: f64, bands: [f64; 3]) -> Self {
        if magnitude >= bands[2] {
            Self::Critical
        } else if magnitude >= bands[1] {
            Self::High
        } else if magnitude >= bands[0] {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Risk points this severity adds to the detector score
    #[must_use]
    pub const fn risk_weight(self) -> f64 {
        match self {
            Self::Low => fatigue::LOW_WEIGHT,
            Self::Moderate => fatigue::MODERATE_WEIGHT,
            Self::High => fatigue::HIGH_WEIGHT,
            Self::Critical => fatigue::CRITICAL_WEIGHT,
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Load intensity category from the acute:current load ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadIntensity {
    /// Ratio below 0.7
    Low,
    /// Ratio below 0.9
    Moderate,
    /// Ratio below 1.1
    High,
    /// Ratio of 1.1 or more
    VeryHigh,
}

impl LoadIntensity {
    /// Categorize a load ratio
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < load::LOW_INTENSITY_RATIO {
            Self::Low
        } else if ratio < load::MODERATE_INTENSITY_RATIO {
            Self::Moderate
        } else if ratio < load::HIGH_INTENSITY_RATIO {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

/// Direction of the average rest gap between the two halves of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestPeriodTrend {
    /// Gaps are getting longer
    Increasing,
    /// Gaps are getting shorter
    Decreasing,
    /// Within the trend threshold
    Stable,
}

/// Trend of a fatigue pattern or plateau factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Getting better
    Improving,
    /// No clear direction
    Stable,
    /// Getting worse
    Worsening,
}
