// ABOUTME: SQLite implementation of the collaborator stores using sqlx
// ABOUTME: Reads workout_sessions, set_logs, exercises and athlete_profiles; can create the schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ironcoach_core::constants::stores;
use ironcoach_core::errors::{AppError, AppResult};
use ironcoach_core::models::{
    AthleteId, AthleteProfile, DateRange, ExerciseId, ExerciseInfo, ExperienceLevel, SessionId,
    SetLog, TrainingGoal, WorkoutSession,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use super::{AthleteProfileStore, ExerciseCatalog, LogStore};

/// `SQLite`-backed store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to a `SQLite` database, creating the file when missing
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the connection cannot be opened
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains('?')
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        info!("Connecting to training log database: {database_url}");
        let pool = SqlitePool::connect(&connection_options).await.map_err(|e| {
            AppError::store_unavailable(stores::LOG_STORE, format!("Failed to connect: {e}"))
                .with_source(e)
        })?;
        Ok(Self { pool })
    }

    /// Create the tables the store reads when they do not exist
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if a statement fails
    pub async fn ensure_schema(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| unavailable(stores::LOG_STORE, "create schema", e))?;
        }
        debug!("Training log schema ready");
        Ok(())
    }

    /// Insert a completed session
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the insert fails
    pub async fn insert_session(&self, session: &WorkoutSession) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workout_sessions (id, athlete_id, date, completed_at, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(session.id.as_str())
        .bind(session.athlete_id.to_string())
        .bind(session.date)
        .bind(session.completed_at)
        .bind(session.duration_minutes.map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable(stores::LOG_STORE, "insert session", e))?;
        Ok(())
    }

    /// Insert a set entry
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the insert fails
    pub async fn insert_set(&self, set: &SetLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO set_logs (session_id, exercise_id, weight, reps, logged_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(set.session_id.as_str())
        .bind(set.exercise_id.as_str())
        .bind(set.weight)
        .bind(i64::from(set.reps))
        .bind(set.logged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable(stores::LOG_STORE, "insert set", e))?;
        Ok(())
    }

    /// Insert or replace catalog metadata
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the write fails
    pub async fn upsert_exercise(&self, exercise: &ExerciseInfo) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercises (id, name, muscle_group) VALUES ($1, $2, $3)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, muscle_group = excluded.muscle_group
            ",
        )
        .bind(exercise.id.as_str())
        .bind(&exercise.name)
        .bind(exercise.muscle_group.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable(stores::EXERCISE_CATALOG, "upsert exercise", e))?;
        Ok(())
    }

    /// Insert or replace an athlete profile
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the write fails
    pub async fn upsert_profile(&self, profile: &AthleteProfile) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO athlete_profiles
                (athlete_id, experience, goal, weekly_frequency, body_weight_kg, height_cm)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(athlete_id) DO UPDATE SET
                experience = excluded.experience,
                goal = excluded.goal,
                weekly_frequency = excluded.weekly_frequency,
                body_weight_kg = excluded.body_weight_kg,
                height_cm = excluded.height_cm
            ",
        )
        .bind(profile.athlete_id.to_string())
        .bind(profile.experience.map(|e| e.as_str()))
        .bind(profile.goal.map(|g| g.as_str()))
        .bind(profile.weekly_frequency)
        .bind(profile.body_weight_kg)
        .bind(profile.height_cm)
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable(stores::ATHLETE_PROFILES, "upsert profile", e))?;
        Ok(())
    }
}

const SCHEMA: [&str; 5] = [
    r"
    CREATE TABLE IF NOT EXISTS workout_sessions (
        id TEXT PRIMARY KEY,
        athlete_id TEXT NOT NULL,
        date TEXT NOT NULL,
        completed_at TEXT NOT NULL,
        duration_minutes INTEGER
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS set_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
        exercise_id TEXT NOT NULL,
        weight REAL NOT NULL,
        reps INTEGER NOT NULL,
        logged_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        muscle_group TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS athlete_profiles (
        athlete_id TEXT PRIMARY KEY,
        experience TEXT,
        goal TEXT,
        weekly_frequency REAL,
        body_weight_kg REAL,
        height_cm REAL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_workout_sessions_athlete_date
        ON workout_sessions(athlete_id, date)
    ",
];

fn unavailable(store: &str, operation: &str, error: sqlx::Error) -> AppError {
    AppError::store_unavailable(store, format!("Failed to {operation}: {error}")).with_source(error)
}

fn corrupt_row(store: &str, message: impl Into<String>) -> AppError {
    AppError::internal(format!("{store} returned an invalid row: {}", message.into()))
}

fn row_to_session(row: &SqliteRow) -> AppResult<WorkoutSession> {
    let id: String = row
        .try_get("id")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode session", e))?;
    let athlete_id: String = row
        .try_get("athlete_id")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode session", e))?;
    let date: NaiveDate = row
        .try_get("date")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode session", e))?;
    let completed_at: DateTime<Utc> = row
        .try_get("completed_at")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode session", e))?;
    let duration_minutes: Option<i64> = row
        .try_get("duration_minutes")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode session", e))?;

    Ok(WorkoutSession {
        id: SessionId::parse(&id).map_err(|e| corrupt_row(stores::LOG_STORE, e.message))?,
        athlete_id: AthleteId::parse(&athlete_id)
            .map_err(|e| corrupt_row(stores::LOG_STORE, e.message))?,
        date,
        completed_at,
        duration_minutes: duration_minutes.and_then(|m| u32::try_from(m).ok()),
    })
}

fn row_to_set(row: &SqliteRow) -> AppResult<SetLog> {
    let session_id: String = row
        .try_get("session_id")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode set", e))?;
    let exercise_id: String = row
        .try_get("exercise_id")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode set", e))?;
    let weight: f64 = row
        .try_get("weight")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode set", e))?;
    let reps: i64 = row
        .try_get("reps")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode set", e))?;
    let logged_at: DateTime<Utc> = row
        .try_get("logged_at")
        .map_err(|e| unavailable(stores::LOG_STORE, "decode set", e))?;

    Ok(SetLog {
        session_id: SessionId::parse(&session_id)
            .map_err(|e| corrupt_row(stores::LOG_STORE, e.message))?,
        exercise_id: ExerciseId::parse(&exercise_id)
            .map_err(|e| corrupt_row(stores::LOG_STORE, e.message))?,
        weight,
        reps: u32::try_from(reps)
            .map_err(|_| corrupt_row(stores::LOG_STORE, format!("negative rep count {reps}")))?,
        logged_at,
    })
}

fn row_to_exercise(exercise_id: &ExerciseId, row: &SqliteRow) -> AppResult<ExerciseInfo> {
    let decode = |e: sqlx::Error| unavailable(stores::EXERCISE_CATALOG, "decode exercise", e);
    Ok(ExerciseInfo {
        id: exercise_id.clone(),
        name: row.try_get("name").map_err(decode)?,
        muscle_group: row.try_get("muscle_group").map_err(decode)?,
    })
}

fn row_to_profile(athlete_id: AthleteId, row: &SqliteRow) -> AppResult<AthleteProfile> {
    let decode = |e: sqlx::Error| unavailable(stores::ATHLETE_PROFILES, "decode profile", e);
    let experience: Option<String> = row.try_get("experience").map_err(decode)?;
    let goal: Option<String> = row.try_get("goal").map_err(decode)?;

    Ok(AthleteProfile {
        athlete_id,
        experience: experience
            .map(|e| e.parse::<ExperienceLevel>())
            .transpose()
            .map_err(|e: AppError| corrupt_row(stores::ATHLETE_PROFILES, e.message))?,
        goal: goal
            .map(|g| g.parse::<TrainingGoal>())
            .transpose()
            .map_err(|e: AppError| corrupt_row(stores::ATHLETE_PROFILES, e.message))?,
        weekly_frequency: row.try_get("weekly_frequency").map_err(decode)?,
        body_weight_kg: row.try_get("body_weight_kg").map_err(decode)?,
        height_cm: row.try_get("height_cm").map_err(decode)?,
    })
}

#[async_trait]
impl LogStore for SqliteStore {
    async fn completed_sessions(
        &self,
        athlete_id: AthleteId,
        range: DateRange,
    ) -> AppResult<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, athlete_id, date, completed_at, duration_minutes
            FROM workout_sessions
            WHERE athlete_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date, completed_at
            ",
        )
        .bind(athlete_id.to_string())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable(stores::LOG_STORE, "read sessions", e))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn set_logs(&self, athlete_id: AthleteId, range: DateRange) -> AppResult<Vec<SetLog>> {
        let rows = sqlx::query(
            r"
            SELECT s.session_id, s.exercise_id, s.weight, s.reps, s.logged_at
            FROM set_logs s
            JOIN workout_sessions w ON w.id = s.session_id
            WHERE w.athlete_id = $1 AND w.date >= $2 AND w.date <= $3
            ORDER BY s.logged_at, s.id
            ",
        )
        .bind(athlete_id.to_string())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable(stores::LOG_STORE, "read sets", e))?;

        rows.iter().map(row_to_set).collect()
    }
}

#[async_trait]
impl ExerciseCatalog for SqliteStore {
    async fn exercise(&self, exercise_id: &ExerciseId) -> AppResult<Option<ExerciseInfo>> {
        let row = sqlx::query("SELECT name, muscle_group FROM exercises WHERE id = $1")
            .bind(exercise_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable(stores::EXERCISE_CATALOG, "read exercise", e))?;

        row.map(|r| row_to_exercise(exercise_id, &r)).transpose()
    }
}

#[async_trait]
impl AthleteProfileStore for SqliteStore {
    async fn profile(&self, athlete_id: AthleteId) -> AppResult<Option<AthleteProfile>> {
        let row = sqlx::query(
            r"
            SELECT experience, goal, weekly_frequency, body_weight_kg, height_cm
            FROM athlete_profiles
            WHERE athlete_id = $1
            ",
        )
        .bind(athlete_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable(stores::ATHLETE_PROFILES, "read profile", e))?;

        row.map(|r| row_to_profile(athlete_id, &r)).transpose()
    }
}
