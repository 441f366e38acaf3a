// ABOUTME: Read-only collaborator interfaces the engine pulls training data through
// ABOUTME: Log store, exercise catalog and athlete profile store with in-memory and SQLite adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Collaborator Stores
//!
//! The engine never writes through these traits. Every failure surfaces as
//! `ErrorCode::StoreUnavailable` so callers can tell collaborator outages
//! apart from bad requests.

use async_trait::async_trait;
use ironcoach_core::errors::AppResult;
use ironcoach_core::models::{
    AthleteId, AthleteProfile, DateRange, ExerciseId, ExerciseInfo, SetLog, TrainingLog,
    WorkoutSession,
};

/// In-memory adapter for fixtures and tests
pub mod memory;
/// `SQLite` adapter backed by sqlx
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Completed sessions and their set entries
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Completed sessions for `athlete_id` dated inside `range`, oldest first
    async fn completed_sessions(
        &self,
        athlete_id: AthleteId,
        range: DateRange,
    ) -> AppResult<Vec<WorkoutSession>>;

    /// Set entries belonging to the athlete's sessions inside `range`
    async fn set_logs(&self, athlete_id: AthleteId, range: DateRange) -> AppResult<Vec<SetLog>>;

    /// Sessions and sets for `range` as one immutable slice
    async fn training_log(&self, athlete_id: AthleteId, range: DateRange) -> AppResult<TrainingLog> {
        let sessions = self.completed_sessions(athlete_id, range).await?;
        let sets = self.set_logs(athlete_id, range).await?;
        Ok(TrainingLog::new(sessions, sets))
    }
}

/// Exercise metadata
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Metadata for one exercise, `None` when uncatalogued
    async fn exercise(&self, exercise_id: &ExerciseId) -> AppResult<Option<ExerciseInfo>>;
}

/// Athlete profiles
#[async_trait]
pub trait AthleteProfileStore: Send + Sync {
    /// Profile for one athlete, `None` when the athlete has not filled one in
    async fn profile(&self, athlete_id: AthleteId) -> AppResult<Option<AthleteProfile>>;
}
