// ABOUTME: Deterministic training log builder for analyzer and pipeline tests
// ABOUTME: Places sessions by days before a fixed reference date and seeds the stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ironcoach::models::{
    AthleteId, AthleteProfile, ExerciseId, ExperienceLevel, SessionId, SetLog, TrainingGoal,
    TrainingLog, WorkoutSession,
};
use ironcoach::{InMemoryStore, SqliteStore};

/// Athlete used by every fixture
pub const ATHLETE_ID: &str = "7d6f0c1e-4f7b-4a8e-9a55-2f1e1c3b8d10";

pub fn athlete() -> AthleteId {
    AthleteId::parse(ATHLETE_ID).unwrap()
}

/// Fixed reference date so results never depend on the wall clock
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn days_before(days: i64) -> NaiveDate {
    as_of() - Duration::days(days)
}

pub fn exercise(id: &str) -> ExerciseId {
    ExerciseId::parse(id).unwrap()
}

pub fn profile(
    experience: Option<ExperienceLevel>,
    goal: Option<TrainingGoal>,
    weekly_frequency: Option<f64>,
) -> AthleteProfile {
    AthleteProfile {
        experience,
        goal,
        weekly_frequency,
        ..AthleteProfile::empty(athlete())
    }
}

/// Days back for three sessions a week over `weeks` weeks
///
/// Each week trains on offsets 2, 4 and 6, so the most recent session is two
/// days before the reference date and the oldest is `weeks x 7 - 1` days back.
pub fn three_per_week(weeks: i64) -> Vec<i64> {
    (0..weeks)
        .rev()
        .flat_map(|week| [6, 4, 2].map(|offset| week * 7 + offset))
        .collect()
}

/// Builder for immutable training log fixtures
#[derive(Debug, Clone)]
pub struct LogBuilder {
    athlete_id: AthleteId,
    sessions: Vec<WorkoutSession>,
    sets: Vec<SetLog>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::for_athlete(athlete())
    }

    pub const fn for_athlete(athlete_id: AthleteId) -> Self {
        Self {
            athlete_id,
            sessions: Vec::new(),
            sets: Vec::new(),
        }
    }

    /// Add a session with one exercise
    #[must_use]
    pub fn session(self, days_back: i64, exercise_id: &str, sets: &[(f64, u32)]) -> Self {
        self.session_with(days_back, &[(exercise_id, sets)])
    }

    /// Add a session with several exercises, sets logged in order
    #[must_use]
    pub fn session_with(mut self, days_back: i64, entries: &[(&str, &[(f64, u32)])]) -> Self {
        let date = days_before(days_back);
        let id = SessionId::parse(&format!("session-{:04}", self.sessions.len())).unwrap();
        let completed_at = Utc.from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap());
        let started_at = completed_at - Duration::minutes(60);

        let mut minute = 0;
        for (exercise_id, sets) in entries {
            for (weight, reps) in *sets {
                self.sets.push(SetLog {
                    session_id: id.clone(),
                    exercise_id: exercise(exercise_id),
                    weight: *weight,
                    reps: *reps,
                    logged_at: started_at + Duration::minutes(minute),
                });
                minute += 2;
            }
        }

        self.sessions.push(WorkoutSession {
            id,
            athlete_id: self.athlete_id,
            date,
            completed_at,
            duration_minutes: Some(60),
        });
        self
    }

    /// Add a session with no sets
    #[must_use]
    pub fn empty_session(self, days_back: i64) -> Self {
        self.session_with(days_back, &[])
    }

    pub fn build(&self) -> TrainingLog {
        TrainingLog::new(self.sessions.clone(), self.sets.clone())
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub fn sets(&self) -> &[SetLog] {
        &self.sets
    }

    pub async fn seed(&self, store: &InMemoryStore) {
        for session in &self.sessions {
            store.insert_session(session.clone()).await;
        }
        store.insert_sets(self.sets.clone()).await;
    }

    pub async fn seed_sqlite(&self, store: &SqliteStore) {
        for session in &self.sessions {
            store.insert_session(session).await.unwrap();
        }
        for set in &self.sets {
            store.insert_set(set).await.unwrap();
        }
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Three sessions a week for eight weeks at a constant 800 per session
///
/// `squat` is trained on the most recent session of every week and `bench`
/// on the other two, one set of 100 x 8 each.
pub fn steady_squat_block() -> LogBuilder {
    three_per_week(8)
        .into_iter()
        .fold(LogBuilder::new(), |builder, days_back| {
            let exercise_id = if days_back % 7 == 2 { "squat" } else { "bench" };
            builder.session(days_back, exercise_id, &[(100.0, 8)])
        })
}

/// Sixteen weeks of a stalling `row`: falling loads, rising rep fall-off and thinning frequency
pub fn stalled_row_block() -> LogBuilder {
    let days: Vec<i64> = (0..21)
        .map(|i| 111 - 4 * i)
        .chain([26, 17, 8])
        .collect();
    days.into_iter()
        .enumerate()
        .fold(LogBuilder::new(), |builder, (i, days_back)| {
            let i = u32::try_from(i).unwrap();
            let weight = f64::from(i).mul_add(-0.75, 110.0);
            let last_reps = 8 - (i / 4).min(4);
            builder.session(
                days_back,
                "row",
                &[(weight, 8), (weight, 8), (weight, last_reps)],
            )
        })
}
