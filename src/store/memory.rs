// ABOUTME: In-memory implementation of the log store, exercise catalog and profile store
// ABOUTME: Used by tests, benchmarks and fixtures; supports simulated outages per store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use ironcoach_core::constants::stores;
use ironcoach_core::errors::{AppError, AppResult};
use ironcoach_core::models::{
    AthleteId, AthleteProfile, DateRange, ExerciseId, ExerciseInfo, SessionId, SetLog,
    WorkoutSession,
};
use tokio::sync::RwLock;

use super::{AthleteProfileStore, ExerciseCatalog, LogStore};

#[derive(Debug, Default)]
struct Inner {
    sessions: Vec<WorkoutSession>,
    sets: Vec<SetLog>,
    exercises: HashMap<ExerciseId, ExerciseInfo>,
    profiles: HashMap<AthleteId, AthleteProfile>,
}

/// All three collaborators backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
    logs_down: AtomicBool,
    catalog_down: AtomicBool,
    profiles_down: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed session
    pub async fn insert_session(&self, session: WorkoutSession) {
        self.inner.write().await.sessions.push(session);
    }

    /// Record set entries
    pub async fn insert_sets(&self, sets: impl IntoIterator<Item = SetLog> + Send) {
        self.inner.write().await.sets.extend(sets);
    }

    /// Add or replace catalog metadata
    pub async fn upsert_exercise(&self, exercise: ExerciseInfo) {
        self.inner
            .write()
            .await
            .exercises
            .insert(exercise.id.clone(), exercise);
    }

    /// Add or replace an athlete profile
    pub async fn upsert_profile(&self, profile: AthleteProfile) {
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.athlete_id, profile);
    }

    /// Make log reads fail with `StoreUnavailable`
    pub fn set_log_store_unavailable(&self, unavailable: bool) {
        self.logs_down.store(unavailable, Ordering::SeqCst);
    }

    /// Make catalog reads fail with `StoreUnavailable`
    pub fn set_catalog_unavailable(&self, unavailable: bool) {
        self.catalog_down.store(unavailable, Ordering::SeqCst);
    }

    /// Make profile reads fail with `StoreUnavailable`
    pub fn set_profiles_unavailable(&self, unavailable: bool) {
        self.profiles_down.store(unavailable, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, store: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable(store, "simulated outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for InMemoryStore {
    async fn completed_sessions(
        &self,
        athlete_id: AthleteId,
        range: DateRange,
    ) -> AppResult<Vec<WorkoutSession>> {
        Self::check(&self.logs_down, stores::LOG_STORE)?;
        let inner = self.inner.read().await;
        let mut sessions: Vec<WorkoutSession> = inner
            .sessions
            .iter()
            .filter(|s| s.athlete_id == athlete_id && range.contains(s.date))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.date, s.completed_at));
        Ok(sessions)
    }

    async fn set_logs(&self, athlete_id: AthleteId, range: DateRange) -> AppResult<Vec<SetLog>> {
        Self::check(&self.logs_down, stores::LOG_STORE)?;
        let inner = self.inner.read().await;
        let session_ids: HashSet<&SessionId> = inner
            .sessions
            .iter()
            .filter(|s| s.athlete_id == athlete_id && range.contains(s.date))
            .map(|s| &s.id)
            .collect();
        Ok(inner
            .sets
            .iter()
            .filter(|s| session_ids.contains(&s.session_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExerciseCatalog for InMemoryStore {
    async fn exercise(&self, exercise_id: &ExerciseId) -> AppResult<Option<ExerciseInfo>> {
        Self::check(&self.catalog_down, stores::EXERCISE_CATALOG)?;
        Ok(self.inner.read().await.exercises.get(exercise_id).cloned())
    }
}

#[async_trait]
impl AthleteProfileStore for InMemoryStore {
    async fn profile(&self, athlete_id: AthleteId) -> AppResult<Option<AthleteProfile>> {
        Self::check(&self.profiles_down, stores::ATHLETE_PROFILES)?;
        Ok(self.inner.read().await.profiles.get(&athlete_id).cloned())
    }
}
