// ABOUTME: Domain models for the training log, athlete profile and exercise catalog
// ABOUTME: Re-exports identifiers, sessions, set logs and analysis windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

/// Athlete profile, experience tier and goal
pub mod athlete;
/// Exercise catalog metadata
pub mod exercise;
/// Typed identifiers
pub mod ids;
/// Workout sessions and set logs
pub mod session;
/// Analysis windows and date ranges
pub mod window;

pub use athlete::{AthleteProfile, ExperienceLevel, TrainingGoal};
pub use exercise::ExerciseInfo;
pub use ids::{AthleteId, ExerciseId, SessionId};
pub use session::{ExerciseSessionSets, SetLog, TrainingLog, WorkoutSession};
pub use window::{AnalysisWindow, DateRange};
