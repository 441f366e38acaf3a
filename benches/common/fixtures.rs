// ABOUTME: Benchmark fixtures generating realistic strength training logs
// ABOUTME: Deterministic so repeated runs measure the same work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Benchmark fixtures for strength training logs.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ironcoach::models::{AthleteId, ExerciseId, SessionId, SetLog, TrainingLog, WorkoutSession};

/// Exercises rotated through the generated sessions
const EXERCISES: [&str; 6] = ["squat", "bench", "deadlift", "row", "press", "pull_up"];

/// Predefined history lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum HistorySize {
    /// Eight weeks, the default context window
    Block,
    /// Sixteen weeks, the default plateau window
    Season,
    /// A full year
    Year,
}

impl HistorySize {
    #[must_use]
    pub const fn weeks(self) -> i64 {
        match self {
            Self::Block => 8,
            Self::Season => 16,
            Self::Year => 52,
        }
    }
}

/// Fixed reference date for every generated log
#[must_use]
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
}

/// Fixed athlete for every generated log
#[must_use]
pub fn athlete() -> AthleteId {
    AthleteId::from_uuid(uuid::Uuid::from_u128(0x7d6f_0c1e_4f7b_4a8e_9a55_2f1e_1c3b_8d10))
}

/// Exercise identifier from the rotation
#[must_use]
pub fn exercise(index: usize) -> ExerciseId {
    ExerciseId::parse(EXERCISES[index % EXERCISES.len()])
        .unwrap_or_else(|_| unreachable!("fixture exercise ids are valid"))
}

/// Four sessions a week, three exercises per session, four sets per exercise
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn generate_log(size: HistorySize) -> TrainingLog {
    let athlete_id = athlete();
    let mut sessions = Vec::new();
    let mut sets = Vec::new();

    for day in (0..size.weeks() * 7).rev() {
        if day % 7 == 1 || day % 7 == 5 || day % 7 == 6 {
            continue;
        }
        let index = sessions.len();
        let date = reference_date() - Duration::days(day);
        let completed_at = Utc.from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap_or_default());
        let id = SessionId::parse(&format!("bench-{index:05}"))
            .unwrap_or_else(|_| unreachable!("fixture session ids are valid"));

        let mut minute = 0;
        for slot in 0..3 {
            let exercise_id = exercise(index + slot);
            let base = 60.0 + 10.0 * slot as f64 + 0.25 * (index / 3) as f64;
            for set in 0..4_u32 {
                sets.push(SetLog {
                    session_id: id.clone(),
                    exercise_id: exercise_id.clone(),
                    weight: base,
                    reps: 10 - set.min(3),
                    logged_at: completed_at - Duration::minutes(60 - minute),
                });
                minute += 3;
            }
        }

        sessions.push(WorkoutSession {
            id,
            athlete_id,
            date,
            completed_at,
            duration_minutes: Some(60),
        });
    }

    TrainingLog::new(sessions, sets)
}
