// ABOUTME: Athlete profile models read from the profile collaborator
// ABOUTME: Experience tier, training goal and body metrics used by progression logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::AthleteId;
use crate::errors::AppError;

/// Athlete experience tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Less than roughly a year of structured lifting
    Beginner,
    /// One to three years of structured lifting
    Intermediate,
    /// Several years of structured lifting, close to adaptation limits
    Advanced,
}

impl ExperienceLevel {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::invalid_input(format!(
                "unknown experience level '{other}'"
            ))),
        }
    }
}

/// Primary training goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    /// Maximal strength, low reps
    Strength,
    /// Muscle growth, moderate reps
    Hypertrophy,
    /// Body composition, high reps
    FatLoss,
    /// General fitness
    General,
}

impl TrainingGoal {
    /// Stable snake_case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Hypertrophy => "hypertrophy",
            Self::FatLoss => "fat_loss",
            Self::General => "general",
        }
    }
}

impl fmt::Display for TrainingGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingGoal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strength" => Ok(Self::Strength),
            "hypertrophy" => Ok(Self::Hypertrophy),
            "fat_loss" => Ok(Self::FatLoss),
            "general" => Ok(Self::General),
            other => Err(AppError::invalid_input(format!(
                "unknown training goal '{other}'"
            ))),
        }
    }
}

/// Athlete profile as stored by the onboarding flow
///
/// Every field except the id may be missing; the engine derives or defaults
/// what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Athlete identifier
    pub athlete_id: AthleteId,
    /// Experience tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceLevel>,
    /// Primary goal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<TrainingGoal>,
    /// Self-reported sessions per week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_frequency: Option<f64>,
    /// Body weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_weight_kg: Option<f64>,
    /// Height in centimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
}

impl AthleteProfile {
    /// Profile with only the identifier set
    #[must_use]
    pub const fn empty(athlete_id: AthleteId) -> Self {
        Self {
            athlete_id,
            experience: None,
            goal: None,
            weekly_frequency: None,
            body_weight_kg: None,
            height_cm: None,
        }
    }
}
