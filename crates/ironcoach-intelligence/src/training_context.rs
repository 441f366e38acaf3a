// ABOUTME: Training context aggregation from raw session and set logs over a trailing window
// ABOUTME: Produces session metrics, rest-period analysis, load metrics and recovery factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Training Context Aggregator
//!
//! Turns the immutable log slice of one athlete into a
//! [`TrainingContextSummary`]. The summary is recomputed on every call and is
//! a pure function of `(athlete, window, log, config)`.
//!
//! ## Load model
//!
//! ```text
//! current_load     = avg_volume_per_session x sessions_per_week x intensity_multiplier
//! acute_load       = same formula over the trailing acute window
//! load_ratio       = acute_load / current_load
//! recovery_demand  = min(100, load_ratio x min(sessions_per_week / 3, 2) x 50)
//! ```
//!
//! With fewer than two sessions a neutral summary is returned instead.

use std::collections::HashMap;

use chrono::NaiveDate;
use ironcoach_core::models::{AnalysisWindow, AthleteId, DateRange, SessionId, TrainingLog};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ContextConfig;
use crate::constants::{load, rest_days};
use crate::statistical_analysis::{clamp_percent, clamp_unit, StatisticalAnalyzer};
use crate::types::{LoadIntensity, RestPeriodTrend, RiskLevel};

/// Volume of one session in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionVolume {
    /// Session identifier
    pub session_id: SessionId,
    /// Session date
    pub date: NaiveDate,
    /// Summed set volume
    pub volume: f64,
    /// Sets attached to the session
    pub set_count: usize,
}

/// Aggregate session statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Completed sessions inside the window
    pub total_sessions: usize,
    /// Sets attached to those sessions
    pub total_sets: usize,
    /// Summed volume
    pub total_volume: f64,
    /// Mean volume per session
    pub average_volume_per_session: f64,
    /// Mean sets per session
    pub average_sets_per_session: f64,
    /// Mean logged duration, when any session has one
    pub average_duration_minutes: Option<f64>,
    /// Sessions divided by effective weeks
    pub sessions_per_week: f64,
    /// Weeks from the first session to the reference date, clamped to the window
    pub effective_weeks: f64,
    /// Oldest session date in the window
    pub first_session_date: Option<NaiveDate>,
    /// Most recent session date in the window
    pub last_session_date: Option<NaiveDate>,
    /// Chronological per-session volumes
    pub session_volumes: Vec<SessionVolume>,
}

/// Rest gaps between consecutive sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestPeriodAnalysis {
    /// Day differences between consecutive session dates
    pub gaps: Vec<i64>,
    /// Mean gap in days
    pub average_rest_days: f64,
    /// Optimal gap for the observed frequency
    pub optimal_rest_days: f64,
    /// 0-100, how closely gaps track the optimal gap
    pub rest_consistency: f64,
    /// First half vs second half of the window
    pub rest_period_trend: RestPeriodTrend,
    /// Longest gap in days
    pub longest_gap_days: i64,
    /// Days from the last session to the reference date
    pub days_since_last_session: Option<i64>,
}

/// Training load model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoadMetrics {
    /// Load over the full window
    pub current_load: f64,
    /// Load over the trailing acute window
    pub acute_load: f64,
    /// Load the athlete can keep up
    pub sustainable_load: f64,
    /// 1.0 with a full history, 0.8 otherwise
    pub consistency_factor: f64,
    /// 1.2 for high-volume sessions, 1.0 otherwise
    pub intensity_multiplier: f64,
    /// Acute load over consistency-adjusted current load
    pub load_ratio: f64,
    /// Category of `load_ratio`
    pub load_intensity: LoadIntensity,
    /// 0-100
    pub recovery_demand: f64,
    /// 0-100 composite of load ratio and recovery demand
    pub risk_score: f64,
    /// Category of `risk_score`
    pub overtraining_risk: RiskLevel,
    /// 0-100 normalized load consumed by phase selection
    pub load_score: f64,
}

/// Recovery readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
    /// Rested at least the optimal gap
    Fresh,
    /// Normal training state
    Ready,
    /// Recovery demand is high or rest is frequently short
    Fatigued,
    /// Load is well beyond what the history supports
    Overreached,
}

/// Recovery indicators derived from the session series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryFactors {
    /// Days from the last session to the reference date
    pub days_since_last_session: Option<i64>,
    /// 0-1, share of transitions that kept at least 95% of the previous volume
    pub recovery_efficiency: f64,
    /// 0-1, share of gaps shorter than half the optimal gap
    pub short_rest_ratio: f64,
    /// Readiness category
    pub status: RecoveryStatus,
}

/// Derived training context for one athlete and window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingContextSummary {
    /// Athlete the summary describes
    pub athlete_id: AthleteId,
    /// Window the summary was computed over
    pub window: AnalysisWindow,
    /// Session statistics
    pub session_metrics: SessionMetrics,
    /// Rest gap analysis
    pub rest_periods: RestPeriodAnalysis,
    /// Load model output
    pub training_load: TrainingLoadMetrics,
    /// Recovery indicators
    pub recovery: RecoveryFactors,
    /// True when fewer than two sessions were available
    pub insufficient_data: bool,
}

/// Training context aggregator
pub struct TrainingContextAggregator;

impl TrainingContextAggregator {
    /// Summarize the log slice inside `window`
    ///
    /// Sessions outside the window and sets without a session are ignored.
    #[must_use]
    pub fn summarize(
        athlete_id: AthleteId,
        window: AnalysisWindow,
        log: &TrainingLog,
        config: &ContextConfig,
    ) -> TrainingContextSummary {
        let range = window.date_range();
        let windowed = log.within(&range);
        let session_volumes = Self::session_volumes(&windowed);
        let session_metrics = Self::session_metrics(&windowed, &window, session_volumes);

        if session_metrics.total_sessions < 2 {
            debug!(
                athlete_id = %athlete_id,
                sessions = session_metrics.total_sessions,
                "Insufficient sessions for training context, returning neutral summary"
            );
            return Self::neutral_summary(athlete_id, window, session_metrics);
        }

        let rest_periods = Self::rest_periods(&session_metrics, window.as_of);
        let training_load = Self::training_load(&session_metrics, &window, config);
        let recovery = Self::recovery_factors(&session_metrics, &rest_periods, &training_load);

        TrainingContextSummary {
            athlete_id,
            window,
            session_metrics,
            rest_periods,
            training_load,
            recovery,
            insufficient_data: false,
        }
    }

    fn session_volumes(log: &TrainingLog) -> Vec<SessionVolume> {
        let by_session = log.sets_by_session();
        log.sessions
            .iter()
            .map(|session| {
                let sets = by_session.get(&session.id);
                SessionVolume {
                    session_id: session.id.clone(),
                    date: session.date,
                    volume: sets.map_or(0.0, |s| s.iter().map(|set| set.volume()).sum()),
                    set_count: sets.map_or(0, Vec::len),
                }
            })
            .collect()
    }

    fn effective_weeks(first: NaiveDate, as_of: NaiveDate, max_weeks: f64) -> f64 {
        let days = (as_of - first).num_days() + 1;
        (days as f64 / 7.0).clamp(1.0, max_weeks.max(1.0))
    }

    fn session_metrics(
        log: &TrainingLog,
        window: &AnalysisWindow,
        session_volumes: Vec<SessionVolume>,
    ) -> SessionMetrics {
        let total_sessions = session_volumes.len();
        let total_sets: usize = session_volumes.iter().map(|s| s.set_count).sum();
        let total_volume: f64 = session_volumes.iter().map(|s| s.volume).sum();
        let first_session_date = session_volumes.first().map(|s| s.date);
        let last_session_date = session_volumes.last().map(|s| s.date);

        let durations: Vec<f64> = log
            .sessions
            .iter()
            .filter_map(|s| s.duration_minutes.map(f64::from))
            .collect();
        let average_duration_minutes =
            (!durations.is_empty()).then(|| StatisticalAnalyzer::mean(&durations));

        let (average_volume_per_session, average_sets_per_session) = if total_sessions == 0 {
            (0.0, 0.0)
        } else {
            (
                total_volume / total_sessions as f64,
                total_sets as f64 / total_sessions as f64,
            )
        };

        let effective_weeks = first_session_date.map_or(1.0, |first| {
            Self::effective_weeks(first, window.as_of, f64::from(window.weeks))
        });

        SessionMetrics {
            total_sessions,
            total_sets,
            total_volume,
            average_volume_per_session,
            average_sets_per_session,
            average_duration_minutes,
            sessions_per_week: total_sessions as f64 / effective_weeks,
            effective_weeks,
            first_session_date,
            last_session_date,
            session_volumes,
        }
    }

    /// Day gaps between consecutive session dates
    #[must_use]
    pub fn rest_gaps(session_volumes: &[SessionVolume]) -> Vec<i64> {
        session_volumes
            .windows(2)
            .map(|pair| (pair[1].date - pair[0].date).num_days())
            .collect()
    }

    /// `100 - mean(|gap - optimal|) / optimal x 100`, clamped to `[0, 100]`
    #[must_use]
    pub fn rest_consistency(gaps: &[i64], optimal_rest_days: f64) -> f64 {
        if gaps.is_empty() || optimal_rest_days <= 0.0 {
            return rest_days::NEUTRAL_REST_CONSISTENCY;
        }
        let deviations: Vec<f64> = gaps
            .iter()
            .map(|g| (*g as f64 - optimal_rest_days).abs())
            .collect();
        let normalized = StatisticalAnalyzer::mean(&deviations) / optimal_rest_days;
        clamp_percent(normalized.mul_add(-100.0, 100.0))
    }

    /// Compare the mean gap of the second half of the series against the first half
    #[must_use]
    pub fn rest_trend(gaps: &[i64]) -> RestPeriodTrend {
        if gaps.len() < 2 {
            return RestPeriodTrend::Stable;
        }
        let as_f64: Vec<f64> = gaps.iter().map(|g| *g as f64).collect();
        let (first, second) = as_f64.split_at(as_f64.len() / 2);
        let first_mean = StatisticalAnalyzer::mean(first);
        let second_mean = StatisticalAnalyzer::mean(second);

        match StatisticalAnalyzer::relative_change(first_mean, second_mean) {
            Some(change) if change > rest_days::TREND_THRESHOLD => RestPeriodTrend::Increasing,
            Some(change) if change < -rest_days::TREND_THRESHOLD => RestPeriodTrend::Decreasing,
            Some(_) => RestPeriodTrend::Stable,
            None if second_mean > 0.0 => RestPeriodTrend::Increasing,
            None => RestPeriodTrend::Stable,
        }
    }

    fn rest_periods(metrics: &SessionMetrics, as_of: NaiveDate) -> RestPeriodAnalysis {
        let gaps = Self::rest_gaps(&metrics.session_volumes);
        let as_f64: Vec<f64> = gaps.iter().map(|g| *g as f64).collect();
        let optimal_rest_days = rest_days::optimal_rest_days(metrics.sessions_per_week);

        RestPeriodAnalysis {
            average_rest_days: StatisticalAnalyzer::mean(&as_f64),
            optimal_rest_days,
            rest_consistency: Self::rest_consistency(&gaps, optimal_rest_days),
            rest_period_trend: Self::rest_trend(&gaps),
            longest_gap_days: gaps.iter().copied().max().unwrap_or(0),
            days_since_last_session: metrics
                .last_session_date
                .map(|d| (as_of - d).num_days().max(0)),
            gaps,
        }
    }

    /// `avg_volume x sessions_per_week x intensity_multiplier` for a set of session volumes
    fn load_for(volumes: &[f64], weeks: f64, high_volume_threshold: f64) -> (f64, f64) {
        if volumes.is_empty() {
            return (0.0, load::BASE_INTENSITY_MULTIPLIER);
        }
        let average = StatisticalAnalyzer::mean(volumes);
        let multiplier = if average > high_volume_threshold {
            load::HIGH_VOLUME_MULTIPLIER
        } else {
            load::BASE_INTENSITY_MULTIPLIER
        };
        let per_week = volumes.len() as f64 / weeks.max(1.0);
        (average * per_week * multiplier, multiplier)
    }

    fn training_load(
        metrics: &SessionMetrics,
        window: &AnalysisWindow,
        config: &ContextConfig,
    ) -> TrainingLoadMetrics {
        let all: Vec<f64> = metrics.session_volumes.iter().map(|s| s.volume).collect();
        let (current_load, intensity_multiplier) = Self::load_for(
            &all,
            metrics.effective_weeks,
            config.high_volume_threshold,
        );

        let acute_range: DateRange = window.trailing_days(config.acute_window_days);
        let acute: Vec<f64> = metrics
            .session_volumes
            .iter()
            .filter(|s| acute_range.contains(s.date))
            .map(|s| s.volume)
            .collect();
        let acute_weeks = metrics.first_session_date.map_or(1.0, |first| {
            Self::effective_weeks(
                first.max(acute_range.start),
                window.as_of,
                acute_range.days() as f64 / 7.0,
            )
        });
        let (acute_load, _) = Self::load_for(&acute, acute_weeks, config.high_volume_threshold);

        let consistency_factor = if metrics.total_sessions >= load::CONSISTENT_HISTORY_SESSIONS {
            load::FULL_CONSISTENCY_FACTOR
        } else {
            load::PARTIAL_CONSISTENCY_FACTOR
        };
        let sustainable_load = current_load * consistency_factor * load::SUSTAINABLE_LOAD_FACTOR;

        let load_ratio = if current_load > f64::EPSILON {
            acute_load / current_load
        } else {
            0.0
        };

        let recovery_demand = Self::recovery_demand(load_ratio, metrics.sessions_per_week);
        let risk_score = Self::risk_score(load_ratio, recovery_demand);

        TrainingLoadMetrics {
            current_load,
            acute_load,
            sustainable_load,
            consistency_factor,
            intensity_multiplier,
            load_ratio,
            load_intensity: LoadIntensity::from_ratio(load_ratio),
            recovery_demand,
            risk_score,
            overtraining_risk: RiskLevel::from_score(risk_score),
            load_score: Self::load_score(load_ratio),
        }
    }

    /// `min(100, load_ratio x frequency_factor x 50)`
    #[must_use]
    pub fn recovery_demand(load_ratio: f64, sessions_per_week: f64) -> f64 {
        let frequency_factor = (sessions_per_week / load::FREQUENCY_FACTOR_BASE_SESSIONS)
            .clamp(0.0, load::MAX_FREQUENCY_FACTOR);
        clamp_percent(load_ratio * frequency_factor * load::RECOVERY_DEMAND_SCALE)
    }

    /// Composite 0-100 risk from load ratio and recovery demand
    #[must_use]
    pub fn risk_score(load_ratio: f64, recovery_demand: f64) -> f64 {
        let ratio_component =
            clamp_unit((load_ratio - load::RISK_RATIO_FLOOR) / load::RISK_RATIO_SPAN) * 100.0;
        let recovery_component = clamp_unit(
            (recovery_demand - load::RISK_RECOVERY_FLOOR) / load::RISK_RECOVERY_SPAN,
        ) * 100.0;
        clamp_percent(
            load::RISK_RATIO_WEIGHT
                .mul_add(ratio_component, load::RISK_RECOVERY_WEIGHT * recovery_component),
        )
    }

    /// Load ratio mapped to 0-100, with 1.5 at the top of the scale
    #[must_use]
    pub fn load_score(load_ratio: f64) -> f64 {
        clamp_percent(load_ratio / load::LOAD_SCORE_FULL_RATIO * 100.0)
    }

    fn recovery_factors(
        metrics: &SessionMetrics,
        rest: &RestPeriodAnalysis,
        training_load: &TrainingLoadMetrics,
    ) -> RecoveryFactors {
        let transitions: Vec<bool> = metrics
            .session_volumes
            .windows(2)
            .filter(|pair| pair[0].volume > 0.0)
            .map(|pair| pair[1].volume >= pair[0].volume * load::RECOVERED_VOLUME_RETENTION)
            .collect();
        let recovery_efficiency = if transitions.is_empty() {
            load::NEUTRAL_RECOVERY_EFFICIENCY
        } else {
            transitions.iter().filter(|ok| **ok).count() as f64 / transitions.len() as f64
        };

        let short_limit = rest.optimal_rest_days * rest_days::SHORT_REST_FRACTION;
        let short_rest_ratio = if rest.gaps.is_empty() {
            0.0
        } else {
            rest.gaps.iter().filter(|g| (**g as f64) < short_limit).count() as f64
                / rest.gaps.len() as f64
        };

        let status = Self::recovery_status(
            training_load,
            short_rest_ratio,
            rest.days_since_last_session,
            rest.optimal_rest_days,
        );

        RecoveryFactors {
            days_since_last_session: rest.days_since_last_session,
            recovery_efficiency: clamp_unit(recovery_efficiency),
            short_rest_ratio: clamp_unit(short_rest_ratio),
            status,
        }
    }

    fn recovery_status(
        training_load: &TrainingLoadMetrics,
        short_rest_ratio: f64,
        days_since_last_session: Option<i64>,
        optimal_rest_days: f64,
    ) -> RecoveryStatus {
        if training_load.overtraining_risk == RiskLevel::Critical
            || training_load.load_ratio >= load::LOAD_SCORE_FULL_RATIO
        {
            RecoveryStatus::Overreached
        } else if training_load.recovery_demand > load::FATIGUED_RECOVERY_DEMAND
            || short_rest_ratio > load::FATIGUED_SHORT_REST_RATIO
        {
            RecoveryStatus::Fatigued
        } else if days_since_last_session.is_none_or(|d| d as f64 >= optimal_rest_days) {
            RecoveryStatus::Fresh
        } else {
            RecoveryStatus::Ready
        }
    }

    /// Documented neutral summary for fewer than two sessions
    fn neutral_summary(
        athlete_id: AthleteId,
        window: AnalysisWindow,
        session_metrics: SessionMetrics,
    ) -> TrainingContextSummary {
        let days_since_last_session = session_metrics
            .last_session_date
            .map(|d| (window.as_of - d).num_days().max(0));

        TrainingContextSummary {
            athlete_id,
            window,
            rest_periods: RestPeriodAnalysis {
                gaps: Vec::new(),
                average_rest_days: 0.0,
                optimal_rest_days: rest_days::optimal_rest_days(session_metrics.sessions_per_week),
                rest_consistency: rest_days::NEUTRAL_REST_CONSISTENCY,
                rest_period_trend: RestPeriodTrend::Stable,
                longest_gap_days: 0,
                days_since_last_session,
            },
            training_load: TrainingLoadMetrics {
                current_load: 0.0,
                acute_load: 0.0,
                sustainable_load: 0.0,
                consistency_factor: load::PARTIAL_CONSISTENCY_FACTOR,
                intensity_multiplier: load::BASE_INTENSITY_MULTIPLIER,
                load_ratio: 0.0,
                load_intensity: LoadIntensity::Moderate,
                recovery_demand: 0.0,
                risk_score: 0.0,
                overtraining_risk: RiskLevel::Low,
                load_score: 0.0,
            },
            recovery: RecoveryFactors {
                days_since_last_session,
                recovery_efficiency: load::NEUTRAL_RECOVERY_EFFICIENCY,
                short_rest_ratio: 0.0,
                status: RecoveryStatus::Ready,
            },
            session_metrics,
            insufficient_data: true,
        }
    }
}

/// Sum set volume per calendar day for the sessions in `summary`
#[must_use]
pub fn daily_volumes(summary: &TrainingContextSummary) -> HashMap<NaiveDate, f64> {
    let mut by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for session in &summary.session_metrics.session_volumes {
        *by_day.entry(session.date).or_insert(0.0) += session.volume;
    }
    by_day
}

/// Volume per trailing 7-day bucket, index 0 ending on the window's reference date
#[must_use]
pub fn weekly_volumes(summary: &TrainingContextSummary) -> Vec<f64> {
    let as_of = summary.window.as_of;
    let mut weeks = vec![0.0; summary.window.weeks as usize];
    for (date, volume) in daily_volumes(summary) {
        let days_back = (as_of - date).num_days();
        if days_back < 0 {
            continue;
        }
        if let Some(bucket) = weeks.get_mut((days_back / 7) as usize) {
            *bucket += volume;
        }
    }
    weeks
}
