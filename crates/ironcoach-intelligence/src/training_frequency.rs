// ABOUTME: Weekly training frequency from the athlete profile or derived from session history
// ABOUTME: Derivation counts distinct session dates over a trailing 12-week window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use ironcoach_core::models::{AthleteProfile, WorkoutSession};

use crate::constants::frequency::{DERIVATION_WEEKS, MAX_WEEKLY_FREQUENCY, MIN_WEEKLY_FREQUENCY};

/// Sessions per week derived from history
///
/// Distinct session dates in the 12 weeks ending on `as_of`, divided by 12,
/// rounded to the nearest 0.5 and clamped to `[1, 7]`.
#[must_use]
pub fn derive_weekly_frequency(sessions: &[WorkoutSession], as_of: NaiveDate) -> f64 {
    let start = as_of - Duration::days(i64::from(DERIVATION_WEEKS) * 7 - 1);
    let distinct: BTreeSet<NaiveDate> = sessions
        .iter()
        .map(|s| s.date)
        .filter(|d| *d >= start && *d <= as_of)
        .collect();
    let per_week = distinct.len() as f64 / f64::from(DERIVATION_WEEKS);
    ((per_week * 2.0).round() / 2.0).clamp(MIN_WEEKLY_FREQUENCY, MAX_WEEKLY_FREQUENCY)
}

/// Profile frequency when present and usable, otherwise the derived value
#[must_use]
pub fn resolve_weekly_frequency(
    profile: Option<&AthleteProfile>,
    sessions: &[WorkoutSession],
    as_of: NaiveDate,
) -> f64 {
    profile
        .and_then(|p| p.weekly_frequency)
        .filter(|f| f.is_finite() && *f > 0.0)
        .map_or_else(
            || derive_weekly_frequency(sessions, as_of),
            |f| f.clamp(MIN_WEEKLY_FREQUENCY, MAX_WEEKLY_FREQUENCY),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ironcoach_core::models::{AthleteId, SessionId};

    fn sessions_on(as_of: NaiveDate, offsets: &[i64]) -> Vec<WorkoutSession> {
        let athlete = AthleteId::new();
        offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let date = as_of - Duration::days(*offset);
                WorkoutSession {
                    id: SessionId::parse(&format!("s{i}")).unwrap(),
                    athlete_id: athlete,
                    date,
                    completed_at: Utc
                        .from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap()),
                    duration_minutes: Some(60),
                }
            })
            .collect()
    }

    #[test]
    fn test_three_sessions_per_week_derives_three() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let offsets: Vec<i64> = (0..12).flat_map(|w| [w * 7, w * 7 + 2, w * 7 + 4]).collect();
        let derived = derive_weekly_frequency(&sessions_on(as_of, &offsets), as_of);
        assert!((derived - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_day_sessions_count_once_and_floor_is_one() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let derived = derive_weekly_frequency(&sessions_on(as_of, &[0, 0, 0, 200]), as_of);
        assert!((derived - 1.0).abs() < f64::EPSILON);
        assert!((derive_weekly_frequency(&[], as_of) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_profile_frequency_wins_over_history() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let mut profile = AthleteProfile::empty(AthleteId::new());
        profile.weekly_frequency = Some(9.0);
        let resolved = resolve_weekly_frequency(Some(&profile), &[], as_of);
        assert!((resolved - 7.0).abs() < f64::EPSILON);
    }
}
