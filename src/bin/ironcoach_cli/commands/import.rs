// ABOUTME: Training log import command for ironcoach-cli
// ABOUTME: Loads sessions, sets, exercises and profiles from a JSON export into SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::fs;
use std::path::Path;

use ironcoach::{
    errors::{AppError, AppResult},
    models::{AthleteProfile, ExerciseInfo, SetLog, WorkoutSession},
    store::SqliteStore,
};
use serde::Deserialize;
use tracing::info;

type Result<T> = AppResult<T>;

/// JSON export layout
#[derive(Deserialize)]
struct LogExport {
    #[serde(default)]
    sessions: Vec<WorkoutSession>,
    #[serde(default)]
    sets: Vec<SetLog>,
    #[serde(default)]
    exercises: Vec<ExerciseInfo>,
    #[serde(default)]
    profiles: Vec<AthleteProfile>,
}

/// Import a JSON export
pub async fn run(store: &SqliteStore, file: &Path) -> Result<()> {
    let raw = fs::read_to_string(file).map_err(|e| {
        AppError::invalid_input(format!("Failed to read {}: {e}", file.display())).with_source(e)
    })?;
    let export: LogExport = serde_json::from_str(&raw)?;

    for session in &export.sessions {
        store.insert_session(session).await?;
    }
    for set in &export.sets {
        store.insert_set(set).await?;
    }
    for exercise in &export.exercises {
        store.upsert_exercise(exercise).await?;
    }
    for profile in &export.profiles {
        store.upsert_profile(profile).await?;
    }

    info!(
        sessions = export.sessions.len(),
        sets = export.sets.len(),
        exercises = export.exercises.len(),
        profiles = export.profiles.len(),
        "Imported training log from {}",
        file.display()
    );
    Ok(())
}
