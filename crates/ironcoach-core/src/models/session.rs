// ABOUTME: Immutable workout session and set log records produced by the logging flow
// ABOUTME: TrainingLog groups the slice of history one analysis call works on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AthleteId, ExerciseId, SessionId};
use super::window::DateRange;

/// A completed workout session
///
/// Created by the workout-logging flow and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Session identifier
    pub id: SessionId,
    /// Athlete who performed the session
    pub athlete_id: AthleteId,
    /// Calendar date the session was performed on
    pub date: NaiveDate,
    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
    /// Session duration in minutes, when logged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// A single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    /// Session this set belongs to
    pub session_id: SessionId,
    /// Exercise performed
    pub exercise_id: ExerciseId,
    /// Load lifted (athlete's unit, kg or lb)
    pub weight: f64,
    /// Repetitions completed
    pub reps: u32,
    /// When the set was recorded
    pub logged_at: DateTime<Utc>,
}

impl SetLog {
    /// Set volume (weight x reps); negative weights count as zero
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight.max(0.0) * f64::from(self.reps)
    }

    /// Estimated one-rep max using the Epley formula
    #[must_use]
    pub fn estimated_one_rep_max(&self) -> f64 {
        if self.reps == 0 {
            return 0.0;
        }
        self.weight.max(0.0) * (1.0 + f64::from(self.reps) / 30.0)
    }
}

/// The raw log slice an analysis call operates on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    /// Completed sessions, oldest first
    pub sessions: Vec<WorkoutSession>,
    /// Set entries belonging to those sessions
    pub sets: Vec<SetLog>,
}

impl TrainingLog {
    /// Build a log, ordering sessions (date, completion time) and sets by timestamp
    #[must_use]
    pub fn new(mut sessions: Vec<WorkoutSession>, mut sets: Vec<SetLog>) -> Self {
        sessions.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.completed_at.cmp(&b.completed_at))
        });
        sets.sort_by_key(|s| s.logged_at);
        Self { sessions, sets }
    }

    /// True when no sessions are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Restrict the log to sessions whose date falls inside `range`
    #[must_use]
    pub fn within(&self, range: &DateRange) -> Self {
        let sessions: Vec<WorkoutSession> = self
            .sessions
            .iter()
            .filter(|s| range.contains(s.date))
            .cloned()
            .collect();
        let ids: HashSet<&SessionId> = sessions.iter().map(|s| &s.id).collect();
        let sets = self
            .sets
            .iter()
            .filter(|s| ids.contains(&s.session_id))
            .cloned()
            .collect();
        Self { sessions, sets }
    }

    /// Group sets by session id
    #[must_use]
    pub fn sets_by_session(&self) -> HashMap<&SessionId, Vec<&SetLog>> {
        let mut grouped: HashMap<&SessionId, Vec<&SetLog>> = HashMap::new();
        for set in &self.sets {
            grouped.entry(&set.session_id).or_default().push(set);
        }
        grouped
    }

    /// Distinct exercises that appear in the log, sorted
    #[must_use]
    pub fn exercise_ids(&self) -> Vec<ExerciseId> {
        let mut ids: Vec<ExerciseId> = self.sets.iter().map(|s| s.exercise_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Look up a session by id
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&WorkoutSession> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Sets of one exercise grouped by session, oldest session first
    ///
    /// Sets whose session is not in the log are dated by their own timestamp.
    #[must_use]
    pub fn exercise_sessions(&self, exercise_id: &ExerciseId) -> Vec<ExerciseSessionSets<'_>> {
        let mut grouped: Vec<ExerciseSessionSets<'_>> = Vec::new();
        for set in self.sets.iter().filter(|s| &s.exercise_id == exercise_id) {
            if let Some(existing) = grouped
                .iter_mut()
                .find(|g| g.session_id == &set.session_id)
            {
                existing.sets.push(set);
                continue;
            }
            let date = self
                .session(&set.session_id)
                .map_or_else(|| set.logged_at.date_naive(), |s| s.date);
            grouped.push(ExerciseSessionSets {
                session_id: &set.session_id,
                date,
                sets: vec![set],
            });
        }
        grouped.sort_by_key(|g| g.date);
        grouped
    }
}

/// One session's sets for a single exercise
#[derive(Debug, Clone)]
pub struct ExerciseSessionSets<'a> {
    /// Session the sets belong to
    pub session_id: &'a SessionId,
    /// Session date
    pub date: NaiveDate,
    /// Sets in logging order
    pub sets: Vec<&'a SetLog>,
}

impl ExerciseSessionSets<'_> {
    /// Total volume of the exercise in this session
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(|s| s.volume()).sum()
    }

    /// Highest single-set volume
    #[must_use]
    pub fn best_set_volume(&self) -> f64 {
        self.sets.iter().map(|s| s.volume()).fold(0.0, f64::max)
    }

    /// Highest estimated one-rep max across the sets
    #[must_use]
    pub fn best_estimated_one_rep_max(&self) -> f64 {
        self.sets
            .iter()
            .map(|s| s.estimated_one_rep_max())
            .fold(0.0, f64::max)
    }

    /// Heaviest set, ties broken by more reps
    #[must_use]
    pub fn top_set(&self) -> Option<&SetLog> {
        self.sets.iter().copied().max_by(|a, b| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.reps.cmp(&b.reps))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn set(session: &str, exercise: &str, weight: f64, reps: u32, minute: u32) -> SetLog {
        SetLog {
            session_id: SessionId::parse(session).unwrap(),
            exercise_id: ExerciseId::parse(exercise).unwrap(),
            weight,
            reps,
            logged_at: Utc.with_ymd_and_hms(2025, 3, 3, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_volume_ignores_negative_weight() {
        assert!((set("s1", "squat", 100.0, 5, 0).volume() - 500.0).abs() < f64::EPSILON);
        assert!(set("s1", "squat", -20.0, 5, 0).volume().abs() < f64::EPSILON);
    }

    #[test]
    fn test_exercise_sessions_groups_and_picks_top_set() {
        let log = TrainingLog::new(
            Vec::new(),
            vec![
                set("s1", "squat", 100.0, 5, 0),
                set("s1", "squat", 110.0, 3, 5),
                set("s1", "bench", 80.0, 8, 10),
                set("s1", "squat", 110.0, 4, 15),
            ],
        );
        let grouped = log.exercise_sessions(&ExerciseId::parse("squat").unwrap());
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].sets.len(), 3);
        let top = grouped[0].top_set().unwrap();
        assert_eq!(top.reps, 4);
        assert!((grouped[0].best_set_volume() - 500.0).abs() < f64::EPSILON);
    }
}
