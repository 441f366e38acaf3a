// ABOUTME: Four-phase periodization cycle with rule-based phase selection and transition checks
// ABOUTME: Accumulation, intensification, realization and deload strictly in that order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Periodization Phase Engine
//!
//! The cycle is fixed: Accumulation → Intensification → Realization → Deload →
//! Accumulation. [`TrainingPhase::next`] is the only successor function and
//! [`PeriodizationEngine::validate_transition`] rejects everything else.
//!
//! Phase selection is a pure function of [`PhaseSignals`]; the first matching
//! rule wins:
//!
//! 1. critical overtraining risk → Deload
//! 2. average rest below 3 days → Deload when load > 70, else Accumulation
//! 3. load below 50 → Accumulation
//! 4. load 50-80 with rest consistency above 70 → Intensification
//! 5. load above 80 with rest consistency above 80 → Realization
//! 6. otherwise Accumulation

use std::fmt;

use chrono::{Duration, NaiveDate};
use ironcoach_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::config::PeriodizationConfig;
use crate::constants::periodization as rules;
use crate::fatigue_detection::OvertrainingAssessment;
use crate::statistical_analysis::StatisticalAnalyzer;
use crate::training_context::{weekly_volumes, TrainingContextSummary};
use crate::types::RiskLevel;

/// Periodization phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    /// Build volume
    Accumulation,
    /// Build intensity
    Intensification,
    /// Peak
    Realization,
    /// Recover
    Deload,
}

impl TrainingPhase {
    /// The only legal successor
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Accumulation => Self::Intensification,
            Self::Intensification => Self::Realization,
            Self::Realization => Self::Deload,
            Self::Deload => Self::Accumulation,
        }
    }

    /// Static characteristics of the phase
    #[must_use]
    pub const fn characteristics(self) -> PhaseCharacteristics {
        match self {
            Self::Accumulation => PhaseCharacteristics {
                volume_multiplier: 1.15,
                intensity_multiplier: 0.80,
                rep_adjustment: 2,
                rest_adjustment_seconds: -15,
                duration_weeks: 4,
                focus: "Build work capacity with higher volume at moderate loads",
            },
            Self::Intensification => PhaseCharacteristics {
                volume_multiplier: 0.95,
                intensity_multiplier: 0.90,
                rep_adjustment: 0,
                rest_adjustment_seconds: 15,
                duration_weeks: 3,
                focus: "Shift toward heavier loads while trimming volume",
            },
            Self::Realization => PhaseCharacteristics {
                volume_multiplier: 0.75,
                intensity_multiplier: 1.0,
                rep_adjustment: -2,
                rest_adjustment_seconds: 60,
                duration_weeks: 2,
                focus: "Express peak strength with low volume and full recovery",
            },
            Self::Deload => PhaseCharacteristics {
                volume_multiplier: 0.5,
                intensity_multiplier: 0.7,
                rep_adjustment: 0,
                rest_adjustment_seconds: 0,
                duration_weeks: 1,
                focus: "Dissipate fatigue with reduced volume and intensity",
            },
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accumulation => "accumulation",
            Self::Intensification => "intensification",
            Self::Realization => "realization",
            Self::Deload => "deload",
        }
    }
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrainingPhase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accumulation" => Ok(Self::Accumulation),
            "intensification" => Ok(Self::Intensification),
            "realization" => Ok(Self::Realization),
            "deload" => Ok(Self::Deload),
            other => Err(AppError::invalid_input(format!(
                "unknown training phase '{other}'"
            ))),
        }
    }
}

/// Static per-phase training emphasis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseCharacteristics {
    /// Volume relative to baseline
    pub volume_multiplier: f64,
    /// Intensity relative to baseline
    pub intensity_multiplier: f64,
    /// Reps added to or removed from the working range
    pub rep_adjustment: i32,
    /// Seconds added to or removed from rest between sets
    pub rest_adjustment_seconds: i32,
    /// Nominal phase length
    pub duration_weeks: u32,
    /// Training emphasis
    pub focus: &'static str,
}

/// Inputs of the phase selection rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSignals {
    /// 0-100 normalized load
    pub load_score: f64,
    /// 0-100
    pub rest_consistency: f64,
    /// Mean rest gap in days
    pub average_rest_days: f64,
    /// Overtraining risk category
    pub overtraining_risk: RiskLevel,
}

impl PhaseSignals {
    /// Signals from a training context, preferring the detector's risk when available
    #[must_use]
    pub fn from_context(
        summary: &TrainingContextSummary,
        assessment: Option<&OvertrainingAssessment>,
    ) -> Self {
        Self {
            load_score: summary.training_load.load_score,
            rest_consistency: summary.rest_periods.rest_consistency,
            average_rest_days: summary.rest_periods.average_rest_days,
            overtraining_risk: assessment
                .map_or(summary.training_load.overtraining_risk, |a| a.risk_level),
        }
    }
}

/// Which selection rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseRule {
    /// Critical overtraining risk
    CriticalRisk,
    /// Short average rest
    ShortRest,
    /// Low load
    LowLoad,
    /// Moderate load with consistent rest
    ModerateLoadConsistentRest,
    /// High load with very consistent rest
    HighLoadConsistentRest,
    /// No other rule matched
    Default,
}

/// Output of the phase selection rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecommendation {
    /// Recommended phase
    pub phase: TrainingPhase,
    /// Rule that produced it
    pub rule: PhaseRule,
    /// Explanation
    pub rationale: String,
}

/// Persisted phase state, optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    /// Current phase
    pub phase: TrainingPhase,
    /// First day of the phase
    pub started_on: NaiveDate,
}

impl PhaseState {
    /// Move to the next phase of the cycle starting on `as_of`
    #[must_use]
    pub const fn advance(self, as_of: NaiveDate) -> Self {
        Self {
            phase: self.phase.next(),
            started_on: as_of,
        }
    }

    /// Move to `to` starting on `as_of`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless `to` is the successor of the current phase
    pub fn transition_to(self, to: TrainingPhase, as_of: NaiveDate) -> AppResult<Self> {
        PeriodizationEngine::validate_transition(self.phase, to)?;
        if as_of < self.started_on {
            return Err(AppError::invalid_input(format!(
                "transition date {as_of} precedes phase start {}",
                self.started_on
            )));
        }
        Ok(Self {
            phase: to,
            started_on: as_of,
        })
    }

    /// Whole weeks elapsed since the phase started
    #[must_use]
    pub fn weeks_elapsed(&self, as_of: NaiveDate) -> u32 {
        let days = (as_of - self.started_on).num_days() + 1;
        u32::try_from(days.max(0) / 7).unwrap_or(u32::MAX)
    }
}

/// Where the current phase came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSource {
    /// Supplied by the caller
    Persisted,
    /// Reconstructed from session history
    Reconstructed,
}

/// Conditions that end a phase before its nominal duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyTrigger {
    /// Realization under high or critical risk
    RealizationUnderRisk,
    /// Accumulation with high load and very consistent rest
    AccumulationAdapted,
    /// Intensification under critical risk
    IntensificationUnderCriticalRisk,
}

/// Risk of applying a transition automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRisk {
    /// Safe to apply
    Low,
    /// Confirm with the athlete
    Medium,
    /// Confirm and review the context
    High,
}

/// Periodization assessment for one athlete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodizationAssessment {
    /// Phase the athlete is in
    pub current_phase: TrainingPhase,
    /// Where `current_phase` came from
    pub phase_source: PhaseSource,
    /// Characteristics of `current_phase`
    pub characteristics: PhaseCharacteristics,
    /// Rule-based recommendation for the current signals
    pub recommendation: PhaseRecommendation,
    /// Weeks spent in `current_phase`
    pub weeks_in_phase: u32,
    /// Whether the athlete should move to `next_phase`
    pub transition_due: bool,
    /// Early trigger that fired, if any
    pub early_trigger: Option<EarlyTrigger>,
    /// Successor of `current_phase`
    pub next_phase: TrainingPhase,
    /// Risk of applying the transition automatically
    pub transition_risk: TransitionRisk,
    /// True unless `transition_risk` is low
    pub requires_confirmation: bool,
    /// State to persist for the current phase
    pub state: PhaseState,
}

/// Periodization phase engine
pub struct PeriodizationEngine;

impl PeriodizationEngine {
    /// Apply the phase selection rules
    #[must_use]
    pub fn recommend_phase(signals: &PhaseSignals) -> PhaseRecommendation {
        let PhaseSignals {
            load_score,
            rest_consistency,
            average_rest_days,
            overtraining_risk,
        } = *signals;

        let (phase, rule, rationale) = if overtraining_risk == RiskLevel::Critical {
            (
                TrainingPhase::Deload,
                PhaseRule::CriticalRisk,
                "Overtraining risk is critical".to_owned(),
            )
        } else if average_rest_days < rules::SHORT_REST_DAYS {
            if load_score > rules::SHORT_REST_DELOAD_LOAD {
                (
                    TrainingPhase::Deload,
                    PhaseRule::ShortRest,
                    format!(
                        "Average rest of {average_rest_days:.1} days under a load of {load_score:.0}"
                    ),
                )
            } else {
                (
                    TrainingPhase::Accumulation,
                    PhaseRule::ShortRest,
                    format!(
                        "Average rest of {average_rest_days:.1} days at a manageable load of {load_score:.0}"
                    ),
                )
            }
        } else if load_score < rules::ACCUMULATION_MAX_LOAD {
            (
                TrainingPhase::Accumulation,
                PhaseRule::LowLoad,
                format!("Load of {load_score:.0} leaves room to build volume"),
            )
        } else if load_score <= rules::INTENSIFICATION_MAX_LOAD
            && rest_consistency > rules::INTENSIFICATION_MIN_CONSISTENCY
        {
            (
                TrainingPhase::Intensification,
                PhaseRule::ModerateLoadConsistentRest,
                format!(
                    "Load of {load_score:.0} with rest consistency {rest_consistency:.0} supports heavier work"
                ),
            )
        } else if load_score > rules::INTENSIFICATION_MAX_LOAD
            && rest_consistency > rules::REALIZATION_MIN_CONSISTENCY
        {
            (
                TrainingPhase::Realization,
                PhaseRule::HighLoadConsistentRest,
                format!(
                    "Load of {load_score:.0} with rest consistency {rest_consistency:.0} is ready to peak"
                ),
            )
        } else {
            (
                TrainingPhase::Accumulation,
                PhaseRule::Default,
                "No specific signal, building volume".to_owned(),
            )
        };

        PhaseRecommendation {
            phase,
            rule,
            rationale,
        }
    }

    /// Accept only the successor of `from`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for any transition other than `from.next()`
    pub fn validate_transition(from: TrainingPhase, to: TrainingPhase) -> AppResult<()> {
        if from.next() == to {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "illegal phase transition {from} -> {to}, expected {from} -> {}",
                from.next()
            )))
        }
    }

    /// Assess the athlete's phase and whether a transition is due
    #[must_use]
    pub fn assess(
        summary: &TrainingContextSummary,
        assessment: Option<&OvertrainingAssessment>,
        previous: Option<&PhaseState>,
        config: &PeriodizationConfig,
    ) -> PeriodizationAssessment {
        let as_of = summary.window.as_of;
        let signals = PhaseSignals::from_context(summary, assessment);
        let recommendation = Self::recommend_phase(&signals);

        let (current_phase, phase_source, weeks_in_phase, state) = previous.map_or_else(
            || {
                let phase = recommendation.phase;
                let weeks = Self::reconstruct_weeks_in_phase(summary, phase, config);
                let started_on = as_of - Duration::days(i64::from(weeks.max(1)) * 7 - 1);
                (
                    phase,
                    PhaseSource::Reconstructed,
                    weeks,
                    PhaseState { phase, started_on },
                )
            },
            |state| {
                (
                    state.phase,
                    PhaseSource::Persisted,
                    state.weeks_elapsed(as_of),
                    *state,
                )
            },
        );

        let characteristics = current_phase.characteristics();
        let early_trigger = Self::early_trigger(current_phase, &signals);
        let transition_due = weeks_in_phase >= characteristics.duration_weeks || early_trigger.is_some();
        let next_phase = current_phase.next();
        let transition_risk = Self::transition_risk(
            &signals,
            next_phase,
            recommendation.phase,
            summary.session_metrics.total_sessions,
        );

        PeriodizationAssessment {
            current_phase,
            phase_source,
            characteristics,
            recommendation,
            weeks_in_phase,
            transition_due,
            early_trigger,
            next_phase,
            transition_risk,
            requires_confirmation: transition_risk != TransitionRisk::Low,
            state,
        }
    }

    fn early_trigger(phase: TrainingPhase, signals: &PhaseSignals) -> Option<EarlyTrigger> {
        match phase {
            TrainingPhase::Realization if signals.overtraining_risk.is_elevated() => {
                Some(EarlyTrigger::RealizationUnderRisk)
            }
            TrainingPhase::Accumulation
                if signals.load_score > rules::INTENSIFICATION_MAX_LOAD
                    && signals.rest_consistency > rules::REALIZATION_MIN_CONSISTENCY =>
            {
                Some(EarlyTrigger::AccumulationAdapted)
            }
            TrainingPhase::Intensification
                if signals.overtraining_risk == RiskLevel::Critical =>
            {
                Some(EarlyTrigger::IntensificationUnderCriticalRisk)
            }
            _ => None,
        }
    }

    /// Weeks the athlete has spent in the current block, from weekly volumes
    ///
    /// Counts consecutive weeks back from the latest that stay within the
    /// block tolerance of the latest week. For deload the run is of weeks below
    /// the deload share of the window mean.
    #[must_use]
    pub fn reconstruct_weeks_in_phase(
        summary: &TrainingContextSummary,
        phase: TrainingPhase,
        config: &PeriodizationConfig,
    ) -> u32 {
        let weeks = weekly_volumes(summary);
        let Some(latest) = weeks.first().copied() else {
            return 0;
        };
        let mean = StatisticalAnalyzer::mean(&weeks);
        if mean <= 0.0 {
            return 0;
        }
        let deload_limit = mean * config.deload_week_volume_ratio;
        let is_deload_week = |v: f64| v < deload_limit;

        let run = if phase == TrainingPhase::Deload {
            weeks.iter().take_while(|v| is_deload_week(**v)).count()
        } else if is_deload_week(latest) {
            0
        } else {
            let tolerance = latest * config.block_volume_tolerance;
            weeks
                .iter()
                .take_while(|v| !is_deload_week(**v) && (**v - latest).abs() <= tolerance)
                .count()
        };
        u32::try_from(run).unwrap_or(u32::MAX)
    }

    fn transition_risk(
        signals: &PhaseSignals,
        next_phase: TrainingPhase,
        recommended: TrainingPhase,
        total_sessions: usize,
    ) -> TransitionRisk {
        let mut points = match signals.overtraining_risk {
            RiskLevel::High | RiskLevel::Critical => 2,
            RiskLevel::Moderate => 1,
            RiskLevel::Low => 0,
        };
        if signals.rest_consistency < rules::TRANSITION_LOW_CONSISTENCY {
            points += 1;
        }
        if next_phase == TrainingPhase::Realization {
            points += 1;
        }
        if recommended != next_phase {
            points += 1;
        }
        if total_sessions < rules::TRANSITION_MIN_SESSIONS {
            points += 1;
        }

        if points <= rules::TRANSITION_LOW_MAX_POINTS {
            TransitionRisk::Low
        } else if points <= rules::TRANSITION_MEDIUM_MAX_POINTS {
            TransitionRisk::Medium
        } else {
            TransitionRisk::High
        }
    }
}
