// ABOUTME: Long-horizon plateau and fatigue analysis for one exercise across seven weighted factors
// ABOUTME: Emits a deload prescription when the weighted plateau risk reaches moderate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Plateau & Long-Horizon Fatigue Analyzer
//!
//! Slower than the progression path and run on demand. Each factor reports a
//! severity in `[0, 1]`; its impact bucket sets the weight it carries in the
//! overall risk:
//!
//! ```text
//! plateau_risk = sum(severity x weight) / sum(weight)
//! weight: critical 3, high 2, moderate 1, low 0.5
//! ```
//!
//! A factor with fewer than `min_data_points` qualifying points reports zero
//! severity and `sufficient_data = false` instead of extrapolating.

use chrono::{Duration, NaiveDate};
use ironcoach_core::models::{
    AthleteProfile, ExerciseId, ExerciseInfo, ExerciseSessionSets, ExperienceLevel, TrainingLog,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlateauConfig;
use crate::constants::{plateau as tables, rest_days};
use crate::periodization::{PeriodizationAssessment, TrainingPhase};
use crate::statistical_analysis::{clamp_unit, StatisticalAnalyzer};
use crate::types::{Severity, Trend};

/// Plateau factor types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateauFactorKind {
    /// Trend of the per-session best estimated 1RM
    ProgressionVelocity,
    /// Last 4 weeks of volume against the 4 before
    VolumeStagnation,
    /// Rest deviation and performance after rest
    RecoveryQuality,
    /// Falling frequency and long gaps
    ConsistencyBreakdown,
    /// Trend of intra-session rep fall-off
    FatigueTrend,
    /// Time in the current phase against its nominal duration
    PeriodizationFit,
    /// Training age against the experience tier
    AdaptationLimit,
}

/// One evaluated factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauFactor {
    /// Factor type
    pub kind: PlateauFactorKind,
    /// 0-1
    pub severity: f64,
    /// Bucket of `severity`
    pub impact: Severity,
    /// Direction of the underlying metric
    pub trend: Trend,
    /// Qualifying data points
    pub data_points: usize,
    /// False when the factor had too few points and reports zero severity
    pub sufficient_data: bool,
    /// Explanation
    pub description: String,
}

/// Overall plateau level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateauLevel {
    /// Risk below 0.2
    None,
    /// Risk below 0.4
    EarlyWarning,
    /// Risk below 0.6
    Moderate,
    /// Risk below 0.8
    Severe,
    /// Risk of 0.8 or more
    Critical,
}

impl PlateauLevel {
    /// Bucket a plateau risk
    #[must_use]
    pub fn from_risk(risk: f64) -> Self {
        let [early, moderate, severe, critical] = tables::LEVEL_BANDS;
        if risk.is_nan() || risk < early {
            Self::None
        } else if risk < moderate {
            Self::EarlyWarning
        } else if risk < severe {
            Self::Moderate
        } else if risk < critical {
            Self::Severe
        } else {
            Self::Critical
        }
    }
}

/// Deload style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadType {
    /// Cut sets, keep loads
    VolumeOnly,
    /// Cut sets and loads
    VolumeAndIntensity,
    /// Cut everything and take extra rest days
    Full,
}

/// Deload prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadRecommendation {
    /// Style
    pub deload_type: DeloadType,
    /// Length in weeks
    pub duration_weeks: u32,
    /// Percentage of working sets to drop
    pub volume_reduction_pct: f64,
    /// Percentage to take off working weights
    pub weight_reduction_pct: f64,
    /// Why the deload is prescribed
    pub rationale: Vec<String>,
    /// What to watch during the deload
    pub monitoring_checklist: Vec<String>,
}

/// Plateau analysis for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauAnalysis {
    /// Exercise analyzed
    pub exercise_id: ExerciseId,
    /// Display name, the id when uncatalogued
    pub exercise_name: String,
    /// Muscle group, "Full Body" when uncatalogued
    pub muscle_group: String,
    /// Reference date
    pub as_of: NaiveDate,
    /// Analysis window
    pub window_weeks: u32,
    /// All seven factors
    pub factors: Vec<PlateauFactor>,
    /// 0-1 weighted risk
    pub plateau_risk: f64,
    /// Bucket of `plateau_risk`
    pub level: PlateauLevel,
    /// Factors at moderate impact or above, most severe first
    pub primary_factors: Vec<PlateauFactorKind>,
    /// Present at moderate level or above
    pub deload: Option<DeloadRecommendation>,
    /// True when no factor had enough data
    pub insufficient_data: bool,
}

/// Inputs for one exercise
#[derive(Debug, Clone, Copy)]
pub struct PlateauInput<'a> {
    /// Exercise to analyze
    pub exercise_id: &'a ExerciseId,
    /// Catalog metadata, when available
    pub exercise: Option<&'a ExerciseInfo>,
    /// Reference date
    pub as_of: NaiveDate,
    /// Log covering at least the analysis window
    pub log: &'a TrainingLog,
    /// Athlete profile, when available
    pub profile: Option<&'a AthleteProfile>,
    /// Current periodization, when available
    pub periodization: Option<&'a PeriodizationAssessment>,
}

/// Plateau and long-horizon fatigue analyzer
pub struct PlateauAnalyzer;

impl PlateauAnalyzer {
    /// Analyze one exercise
    #[must_use]
    pub fn analyze(input: &PlateauInput<'_>, config: &PlateauConfig) -> PlateauAnalysis {
        let window_start = input.as_of - Duration::days(i64::from(config.window_weeks) * 7 - 1);
        let all_sessions = input.log.exercise_sessions(input.exercise_id);
        let training_start = all_sessions.first().map(|s| s.date);
        let sessions: Vec<ExerciseSessionSets<'_>> = all_sessions
            .into_iter()
            .filter(|s| s.date >= window_start && s.date <= input.as_of)
            .collect();

        let min_points = config.min_data_points;
        let factors = vec![
            Self::progression_velocity(&sessions, min_points),
            Self::volume_stagnation(&sessions, input.as_of, min_points),
            Self::recovery_quality(&sessions, config.window_weeks, min_points),
            Self::consistency_breakdown(&sessions, input.as_of, config.window_weeks, min_points),
            Self::fatigue_trend(&sessions, min_points),
            Self::periodization_fit(&sessions, input.periodization, min_points),
            Self::adaptation_limit(
                &sessions,
                training_start,
                input.as_of,
                input.profile.and_then(|p| p.experience),
                min_points,
            ),
        ];

        let plateau_risk = Self::plateau_risk(&factors);
        let level = PlateauLevel::from_risk(plateau_risk);
        let insufficient_data = factors.iter().all(|f| !f.sufficient_data);

        let mut ranked: Vec<&PlateauFactor> = factors
            .iter()
            .filter(|f| f.impact >= Severity::Moderate)
            .collect();
        ranked.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let primary_factors: Vec<PlateauFactorKind> = ranked.iter().map(|f| f.kind).collect();
        let deload = Self::deload_recommendation(level, &ranked);

        let fallback;
        let info = if let Some(info) = input.exercise {
            info
        } else {
            fallback = ExerciseInfo::fallback(input.exercise_id);
            &fallback
        };

        debug!(
            exercise_id = %input.exercise_id,
            plateau_risk,
            level = ?level,
            sessions = sessions.len(),
            "Plateau analysis complete"
        );

        PlateauAnalysis {
            exercise_id: input.exercise_id.clone(),
            exercise_name: info.display_name().to_owned(),
            muscle_group: info.muscle_group_or_default().to_owned(),
            as_of: input.as_of,
            window_weeks: config.window_weeks,
            factors,
            plateau_risk,
            level,
            primary_factors,
            deload,
            insufficient_data,
        }
    }

    /// Analyze independent exercises in parallel
    #[must_use]
    pub fn analyze_many(inputs: &[PlateauInput<'_>], config: &PlateauConfig) -> Vec<PlateauAnalysis> {
        inputs
            .par_iter()
            .map(|input| Self::analyze(input, config))
            .collect()
    }

    /// Impact bucket for a severity
    #[must_use]
    pub fn impact(severity: f64) -> Severity {
        Severity::from_bands(severity, tables::IMPACT_BANDS)
    }

    const fn impact_weight(impact: Severity) -> f64 {
        let [low, moderate, high, critical] = tables::IMPACT_WEIGHTS;
        match impact {
            Severity::Low => low,
            Severity::Moderate => moderate,
            Severity::High => high,
            Severity::Critical => critical,
        }
    }

    /// Impact-weighted average severity, in `[0, 1]`
    #[must_use]
    pub fn plateau_risk(factors: &[PlateauFactor]) -> f64 {
        let (weighted, total) = factors.iter().fold((0.0, 0.0), |(weighted, total), f| {
            let weight = Self::impact_weight(f.impact);
            (clamp_unit(f.severity).mul_add(weight, weighted), total + weight)
        });
        if total <= 0.0 {
            0.0
        } else {
            clamp_unit(weighted / total)
        }
    }

    fn factor(
        kind: PlateauFactorKind,
        severity: f64,
        trend: Trend,
        data_points: usize,
        description: String,
    ) -> PlateauFactor {
        let severity = clamp_unit(severity);
        PlateauFactor {
            kind,
            severity,
            impact: Self::impact(severity),
            trend,
            data_points,
            sufficient_data: true,
            description,
        }
    }

    fn insufficient(kind: PlateauFactorKind, data_points: usize, needed: usize) -> PlateauFactor {
        PlateauFactor {
            kind,
            severity: 0.0,
            impact: Severity::Low,
            trend: Trend::Stable,
            data_points,
            sufficient_data: false,
            description: format!("Not enough data ({data_points} of {needed} points)"),
        }
    }

    fn slope_trend(normalized_slope: f64, higher_is_better: bool) -> Trend {
        if normalized_slope.abs() < tables::SLOPE_TREND_THRESHOLD {
            Trend::Stable
        } else if (normalized_slope > 0.0) == higher_is_better {
            Trend::Improving
        } else {
            Trend::Worsening
        }
    }

    fn progression_velocity(sessions: &[ExerciseSessionSets<'_>], min_points: usize) -> PlateauFactor {
        let kind = PlateauFactorKind::ProgressionVelocity;
        let series: Vec<f64> = sessions
            .iter()
            .map(ExerciseSessionSets::best_estimated_one_rep_max)
            .filter(|v| *v > 0.0)
            .collect();
        if series.len() < min_points {
            return Self::insufficient(kind, series.len(), min_points);
        }
        let Some(velocity) = StatisticalAnalyzer::normalized_slope(&series) else {
            return Self::insufficient(kind, series.len(), min_points);
        };
        let severity = (tables::HEALTHY_VELOCITY - velocity) / tables::VELOCITY_SPAN;
        Self::factor(
            kind,
            severity,
            Self::slope_trend(velocity, true),
            series.len(),
            format!(
                "Estimated 1RM changes {:+.2}% per session",
                velocity * 100.0
            ),
        )
    }

    fn block_volume(sessions: &[ExerciseSessionSets<'_>], from: NaiveDate, to: NaiveDate) -> (f64, usize) {
        sessions
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .fold((0.0, 0), |(volume, count), s| (volume + s.volume(), count + 1))
    }

    fn volume_stagnation(
        sessions: &[ExerciseSessionSets<'_>],
        as_of: NaiveDate,
        min_points: usize,
    ) -> PlateauFactor {
        let kind = PlateauFactorKind::VolumeStagnation;
        let block_days = tables::VOLUME_BLOCK_WEEKS * 7;
        let recent_start = as_of - Duration::days(block_days - 1);
        let previous_start = recent_start - Duration::days(block_days);
        let (recent, recent_count) = Self::block_volume(sessions, recent_start, as_of);
        let (previous, previous_count) =
            Self::block_volume(sessions, previous_start, recent_start - Duration::days(1));
        let points = recent_count + previous_count;

        if points < min_points || recent_count == 0 || previous_count == 0 {
            return Self::insufficient(kind, points, min_points);
        }
        let Some(change) = StatisticalAnalyzer::relative_change(previous, recent) else {
            return Self::insufficient(kind, points, min_points);
        };
        let severity = (tables::HEALTHY_VOLUME_GROWTH - change) / tables::VOLUME_SPAN;
        let trend = if change > tables::HEALTHY_VOLUME_GROWTH {
            Trend::Improving
        } else if change < 0.0 {
            Trend::Worsening
        } else {
            Trend::Stable
        };
        Self::factor(
            kind,
            severity,
            trend,
            points,
            format!(
                "Volume over the last {} weeks changed {:+.0}% against the {} before",
                tables::VOLUME_BLOCK_WEEKS,
                change * 100.0,
                tables::VOLUME_BLOCK_WEEKS
            ),
        )
    }

    fn recovery_quality(
        sessions: &[ExerciseSessionSets<'_>],
        window_weeks: u32,
        min_points: usize,
    ) -> PlateauFactor {
        let kind = PlateauFactorKind::RecoveryQuality;
        let gaps: Vec<f64> = sessions
            .windows(2)
            .map(|pair| (pair[1].date - pair[0].date).num_days() as f64)
            .collect();
        if gaps.len() < min_points {
            return Self::insufficient(kind, gaps.len(), min_points);
        }

        let per_week = sessions.len() as f64 / f64::from(window_weeks.max(1));
        let optimal = rest_days::optimal_rest_days(per_week);
        let deviations: Vec<f64> = gaps.iter().map(|g| (g - optimal).abs() / optimal).collect();
        let deviation = StatisticalAnalyzer::mean(&deviations).min(1.0);

        let ratios: Vec<f64> = sessions
            .windows(2)
            .filter_map(|pair| {
                let before = pair[0].best_set_volume();
                (before > 0.0).then(|| pair[1].best_set_volume() / before)
            })
            .collect();
        let post_rest_ratio = if ratios.is_empty() {
            1.0
        } else {
            StatisticalAnalyzer::mean(&ratios)
        };
        let performance_loss = clamp_unit((1.0 - post_rest_ratio) / tables::POST_REST_LOSS_SPAN);
        let severity = 0.5f64.mul_add(deviation, 0.5 * performance_loss);

        let trend = if post_rest_ratio > 1.0 + tables::SLOPE_TREND_THRESHOLD {
            Trend::Improving
        } else if post_rest_ratio < 1.0 - tables::SLOPE_TREND_THRESHOLD {
            Trend::Worsening
        } else {
            Trend::Stable
        };
        Self::factor(
            kind,
            severity,
            trend,
            gaps.len(),
            format!(
                "Rest deviates {:.0}% from the {optimal:.1}-day optimum; sessions after rest reach {:.0}% of the previous best set",
                deviation * 100.0,
                post_rest_ratio * 100.0
            ),
        )
    }

    fn consistency_breakdown(
        sessions: &[ExerciseSessionSets<'_>],
        as_of: NaiveDate,
        window_weeks: u32,
        min_points: usize,
    ) -> PlateauFactor {
        let kind = PlateauFactorKind::ConsistencyBreakdown;
        if sessions.len() < min_points {
            return Self::insufficient(kind, sessions.len(), min_points);
        }

        let recent_weeks = tables::VOLUME_BLOCK_WEEKS;
        let earlier_weeks = (i64::from(window_weeks) - recent_weeks).max(1);
        let recent_start = as_of - Duration::days(recent_weeks * 7 - 1);
        let recent_count = sessions.iter().filter(|s| s.date >= recent_start).count();
        let earlier_count = sessions.len() - recent_count;
        let recent_rate = recent_count as f64 / recent_weeks as f64;
        let earlier_rate = earlier_count as f64 / earlier_weeks as f64;

        let frequency_drop = if earlier_rate > 0.0 {
            ((earlier_rate - recent_rate) / earlier_rate).max(0.0)
        } else {
            0.0
        };
        let mut gap_dates: Vec<NaiveDate> = sessions.iter().map(|s| s.date).collect();
        gap_dates.push(as_of);
        let long_gaps = gap_dates
            .windows(2)
            .filter(|pair| (pair[1] - pair[0]).num_days() > tables::LONG_GAP_DAYS)
            .count();
        let severity = (long_gaps as f64).mul_add(tables::LONG_GAP_PENALTY, frequency_drop);

        let trend = if recent_rate > earlier_rate * 1.1 {
            Trend::Improving
        } else if recent_rate < earlier_rate * 0.9 {
            Trend::Worsening
        } else {
            Trend::Stable
        };
        Self::factor(
            kind,
            severity,
            trend,
            sessions.len(),
            format!(
                "{recent_rate:.1} sessions per week recently against {earlier_rate:.1} before, {long_gaps} break(s) over {} days",
                tables::LONG_GAP_DAYS
            ),
        )
    }

    /// Relative rep fall-off from the first to the last set of a session
    fn rep_fall_off(session: &ExerciseSessionSets<'_>) -> Option<f64> {
        if session.sets.len() < 2 {
            return None;
        }
        let first = f64::from(session.sets.first()?.reps);
        let last = f64::from(session.sets.last()?.reps);
        (first > 0.0).then(|| ((first - last) / first).max(0.0))
    }

    fn fatigue_trend(sessions: &[ExerciseSessionSets<'_>], min_points: usize) -> PlateauFactor {
        let kind = PlateauFactorKind::FatigueTrend;
        let series: Vec<f64> = sessions.iter().filter_map(Self::rep_fall_off).collect();
        if series.len() < min_points {
            return Self::insufficient(kind, series.len(), min_points);
        }
        let slope = StatisticalAnalyzer::linear_regression(&series).map_or(0.0, |r| r.slope);
        let recent = &series[series.len().saturating_sub(3)..];
        let level = clamp_unit(StatisticalAnalyzer::mean(recent) / tables::FATIGUE_LEVEL_SPAN);
        let rising = clamp_unit(slope / tables::FATIGUE_SLOPE_SPAN);
        let severity = 0.5f64.mul_add(level, 0.5 * rising);

        Self::factor(
            kind,
            severity,
            Self::slope_trend(slope, false),
            series.len(),
            format!(
                "Reps fall {:.0}% from first to last set recently, changing {:+.1} points per session",
                StatisticalAnalyzer::mean(recent) * 100.0,
                slope * 100.0
            ),
        )
    }

    fn periodization_fit(
        sessions: &[ExerciseSessionSets<'_>],
        periodization: Option<&PeriodizationAssessment>,
        min_points: usize,
    ) -> PlateauFactor {
        let kind = PlateauFactorKind::PeriodizationFit;
        let Some(phase) = periodization else {
            return Self::insufficient(kind, 0, min_points);
        };
        if sessions.len() < min_points {
            return Self::insufficient(kind, sessions.len(), min_points);
        }
        if phase.current_phase == TrainingPhase::Deload {
            return Self::factor(
                kind,
                0.0,
                Trend::Improving,
                sessions.len(),
                "Currently deloading".to_owned(),
            );
        }

        let nominal = f64::from(phase.characteristics.duration_weeks.max(1));
        let overrun = (f64::from(phase.weeks_in_phase) - nominal) / nominal;
        let mismatch = if phase.recommendation.phase == phase.current_phase {
            0.0
        } else {
            0.25
        };
        let severity = clamp_unit(overrun) + mismatch;
        let trend = if overrun > 0.0 {
            Trend::Worsening
        } else {
            Trend::Stable
        };
        Self::factor(
            kind,
            severity,
            trend,
            sessions.len(),
            format!(
                "{} week(s) into {} against a nominal {} week(s)",
                phase.weeks_in_phase, phase.current_phase, phase.characteristics.duration_weeks
            ),
        )
    }

    fn adaptation_limit(
        sessions: &[ExerciseSessionSets<'_>],
        training_start: Option<NaiveDate>,
        as_of: NaiveDate,
        experience: Option<ExperienceLevel>,
        min_points: usize,
    ) -> PlateauFactor {
        let kind = PlateauFactorKind::AdaptationLimit;
        let Some(start) = training_start.filter(|_| sessions.len() >= min_points) else {
            return Self::insufficient(kind, sessions.len(), min_points);
        };
        let experience = experience.unwrap_or(ExperienceLevel::Intermediate);
        let (baseline, span, horizon_weeks) = match experience {
            ExperienceLevel::Beginner => tables::BEGINNER_ADAPTATION,
            ExperienceLevel::Intermediate => tables::INTERMEDIATE_ADAPTATION,
            ExperienceLevel::Advanced => tables::ADVANCED_ADAPTATION,
        };
        let age_weeks = (as_of - start).num_days().max(0) as f64 / 7.0;
        let severity = clamp_unit(age_weeks / horizon_weeks).mul_add(span, baseline);

        Self::factor(
            kind,
            severity,
            Trend::Stable,
            sessions.len(),
            format!(
                "{age_weeks:.0} weeks of logged training on this exercise at {experience} level"
            ),
        )
    }

    fn deload_recommendation(
        level: PlateauLevel,
        ranked: &[&PlateauFactor],
    ) -> Option<DeloadRecommendation> {
        let (deload_type, (duration_weeks, volume_reduction_pct, weight_reduction_pct)) = match level {
            PlateauLevel::Critical => (DeloadType::Full, tables::CRITICAL_DELOAD),
            PlateauLevel::Severe => (DeloadType::VolumeAndIntensity, tables::SEVERE_DELOAD),
            PlateauLevel::Moderate => (DeloadType::VolumeOnly, tables::MODERATE_DELOAD),
            PlateauLevel::None | PlateauLevel::EarlyWarning => return None,
        };

        let mut rationale: Vec<String> = ranked
            .iter()
            .take(3)
            .map(|f| f.description.clone())
            .collect();
        rationale.insert(
            0,
            format!(
                "Plateau level {level:?}: cut volume {volume_reduction_pct:.0}% and weight {weight_reduction_pct:.0}% for {duration_weeks} week(s)"
            ),
        );

        let mut monitoring_checklist = vec![
            "Log every session of the deload at the reduced loads".to_owned(),
            "Note sleep quality and general soreness each morning".to_owned(),
            "Retest the top set in the first session after the deload".to_owned(),
        ];
        if ranked.iter().any(|f| f.kind == PlateauFactorKind::ConsistencyBreakdown) {
            monitoring_checklist.push("Keep the session schedule fixed during the deload".to_owned());
        }
        if ranked.iter().any(|f| f.kind == PlateauFactorKind::FatigueTrend) {
            monitoring_checklist.push("Check that reps hold steady across sets".to_owned());
        }
        if deload_type == DeloadType::Full {
            monitoring_checklist.push("Add at least one extra rest day per week".to_owned());
        }

        Some(DeloadRecommendation {
            deload_type,
            duration_weeks,
            volume_reduction_pct,
            weight_reduction_pct,
            rationale,
            monitoring_checklist,
        })
    }
}
