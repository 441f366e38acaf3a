// ABOUTME: Per-exercise weight and rep progression from the last performance and training context
// ABOUTME: Multiplies a base increment by volume, recovery and plateau factors, then quantizes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Progression Recommendation Engine
//!
//! ```text
//! total_increment  = base_increment x volume_multiplier x recovery_factor x plateau_adjustment
//! suggested_weight = quantize(last_weight x (1 + total_increment), quantum)
//! ```
//!
//! Without an athlete profile or training context the engine falls back to a
//! flat 5% step at confidence 0.5 and says so in the reasoning. It never fails
//! for missing history.

use chrono::NaiveDate;
use ironcoach_core::models::{
    AthleteProfile, ExerciseId, ExerciseSessionSets, ExperienceLevel, SetLog, TrainingGoal,
    TrainingLog,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProgressionConfig;
use crate::constants::progression as tables;
use crate::fatigue_detection::OvertrainingAssessment;
use crate::periodization::{PeriodizationAssessment, TrainingPhase};
use crate::plateau_analyzer::{PlateauAnalysis, PlateauLevel};
use crate::statistical_analysis::{quantize, StatisticalAnalyzer};
use crate::training_context::TrainingContextSummary;
use crate::types::{LoadIntensity, RiskLevel};

/// Last recorded top set of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastPerformance {
    /// Load of the top set
    pub weight: f64,
    /// Reps of the top set
    pub reps: u32,
    /// Date of the session it was performed in
    pub date: NaiveDate,
}

/// Everything the engine reads for one exercise
#[derive(Debug, Clone, Copy)]
pub struct ProgressionInput<'a> {
    /// Exercise to progress
    pub exercise_id: &'a ExerciseId,
    /// Reference date
    pub as_of: NaiveDate,
    /// Log slice that contains the exercise's history
    pub log: &'a TrainingLog,
    /// Athlete profile, when available
    pub profile: Option<&'a AthleteProfile>,
    /// Sessions per week, resolved from the profile or history
    pub weekly_frequency: Option<f64>,
    /// Training context
    pub context: Option<&'a TrainingContextSummary>,
    /// Detector output
    pub assessment: Option<&'a OvertrainingAssessment>,
    /// Periodization output
    pub periodization: Option<&'a PeriodizationAssessment>,
    /// Long-horizon plateau analysis for the exercise
    pub plateau: Option<&'a PlateauAnalysis>,
}

/// Factor breakdown behind a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionFactors {
    /// Table increment for experience and frequency
    pub base_increment: f64,
    /// 0.7-1.0
    pub volume_multiplier: f64,
    /// 0.5-1.3
    pub recovery_factor: f64,
    /// 0.5-1.2
    pub plateau_adjustment: f64,
    /// Product of the four factors
    pub total_increment: f64,
    /// Exercise volume over the trailing 7 days
    pub weekly_volume: f64,
    /// Sessions per week used for the table lookup
    pub weekly_frequency: f64,
    /// Days since the exercise was last trained
    pub rest_days: i64,
}

/// Variant of the main recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    /// Smaller step under elevated risk
    Conservative,
    /// Larger step when the athlete is under-loaded and consistent
    Aggressive,
}

/// Alternative suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionAlternative {
    /// Variant type
    pub kind: AlternativeKind,
    /// Quantized weight
    pub suggested_weight: f64,
    /// Reps
    pub suggested_reps: u32,
    /// Increment used
    pub increment: f64,
    /// Explanation
    pub rationale: String,
}

/// Progression recommendation for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecommendation {
    /// Exercise the recommendation is for
    pub exercise_id: ExerciseId,
    /// Last top set, when the exercise has history
    pub last_performance: Option<LastPerformance>,
    /// Non-negative multiple of the weight quantum
    pub suggested_weight: f64,
    /// Suggested reps
    pub suggested_reps: u32,
    /// 0-1
    pub confidence: f64,
    /// Human-readable steps behind the numbers
    pub reasoning: Vec<String>,
    /// At most two variants
    pub alternatives: Vec<ProgressionAlternative>,
    /// Local plateau over the last sessions
    pub plateau_detected: bool,
    /// A deload should precede further progression
    pub deload_recommended: bool,
    /// Profile or context was missing
    pub used_defaults: bool,
    /// Factor breakdown, absent for defaulted recommendations
    pub factors: Option<ProgressionFactors>,
}

/// Progression recommendation engine
pub struct ProgressionEngine;

impl ProgressionEngine {
    /// Recommend the next weight and reps for one exercise
    #[must_use]
    pub fn recommend(input: &ProgressionInput<'_>, config: &ProgressionConfig) -> ProgressionRecommendation {
        let sessions = input.log.exercise_sessions(input.exercise_id);
        let Some(last) = sessions
            .last()
            .and_then(|s| s.top_set().map(|set| Self::last_performance(set, s.date)))
        else {
            debug!(
                exercise_id = %input.exercise_id,
                "No recorded sets for exercise, returning starting recommendation"
            );
            return Self::no_history(input.exercise_id);
        };

        let recent = &sessions[sessions.len().saturating_sub(tables::PLATEAU_SESSIONS)..];
        let best_volumes: Vec<f64> = recent.iter().map(ExerciseSessionSets::best_set_volume).collect();
        let recent_sets: usize = recent.iter().map(|s| s.sets.len()).sum();
        let plateau_detected = recent_sets >= tables::PLATEAU_MIN_SETS
            && Self::local_plateau(&best_volumes, config.plateau_improvement_threshold);

        let profile = input.profile.filter(|p| p.experience.is_some());
        let (Some(profile), Some(context)) = (profile, input.context) else {
            debug!(
                exercise_id = %input.exercise_id,
                has_profile = input.profile.is_some(),
                has_context = input.context.is_some(),
                "Missing profile or context, using default progression"
            );
            return Self::with_defaults(input, last, plateau_detected, config);
        };

        Self::full_recommendation(input, profile, context, last, plateau_detected, config)
    }

    fn last_performance(set: &SetLog, date: NaiveDate) -> LastPerformance {
        LastPerformance {
            weight: set.weight.max(0.0),
            reps: set.reps,
            date,
        }
    }

    /// Table increment for an experience tier and weekly frequency
    ///
    /// Frequency buckets are `<= 2`, `<= 4` and `> 4` sessions per week.
    #[must_use]
    pub fn base_increment(experience: ExperienceLevel, weekly_frequency: f64) -> f64 {
        let row = match experience {
            ExperienceLevel::Beginner => tables::BEGINNER_INCREMENTS,
            ExperienceLevel::Intermediate => tables::INTERMEDIATE_INCREMENTS,
            ExperienceLevel::Advanced => tables::ADVANCED_INCREMENTS,
        };
        let bucket = if weekly_frequency <= tables::LOW_FREQUENCY_BUCKET {
            0
        } else if weekly_frequency <= tables::MODERATE_FREQUENCY_BUCKET {
            1
        } else {
            2
        };
        row[bucket]
    }

    /// `clamp(1 - weekly_volume / 10000 x 0.3, 0.7, 1.0)`
    #[must_use]
    pub fn volume_multiplier(weekly_volume: f64) -> f64 {
        let raw = (weekly_volume.max(0.0) / tables::VOLUME_SCALE)
            .mul_add(-tables::VOLUME_PENALTY, 1.0);
        raw.clamp(tables::MIN_VOLUME_MULTIPLIER, tables::MAX_VOLUME_MULTIPLIER)
    }

    /// Recovery factor from rest days and the athlete's load state
    #[must_use]
    pub fn recovery_factor(
        rest_days: i64,
        weekly_frequency: f64,
        load_intensity: LoadIntensity,
        recovery_demand: f64,
        risk: RiskLevel,
    ) -> f64 {
        let mut factor = match rest_days {
            d if d >= tables::LONG_LAYOFF_DAYS
                && weekly_frequency <= tables::LONG_LAYOFF_MAX_FREQUENCY =>
            {
                tables::RECOVERY_LONG_LAYOFF
            }
            d if d <= 0 => tables::RECOVERY_SAME_DAY,
            1 => tables::RECOVERY_ONE_DAY,
            2 => tables::RECOVERY_TWO_DAYS,
            _ => tables::RECOVERY_EXTENDED,
        };
        match load_intensity {
            LoadIntensity::VeryHigh => factor *= tables::VERY_HIGH_INTENSITY_RECOVERY,
            LoadIntensity::Low => factor *= tables::LOW_INTENSITY_BOOST,
            LoadIntensity::Moderate | LoadIntensity::High => {}
        }
        if recovery_demand > tables::HIGH_RECOVERY_DEMAND {
            factor *= tables::HIGH_DEMAND_RECOVERY;
        }
        if risk.is_elevated() {
            factor *= tables::ELEVATED_RISK_RECOVERY;
        }
        factor.clamp(tables::MIN_RECOVERY_FACTOR, tables::MAX_RECOVERY_FACTOR)
    }

    /// Adjustment for overtraining risk and under-loading
    #[must_use]
    pub fn plateau_adjustment(risk: RiskLevel, load_intensity: LoadIntensity) -> f64 {
        let mut adjustment = match risk {
            RiskLevel::Critical => tables::CRITICAL_RISK_ADJUSTMENT,
            RiskLevel::High => tables::HIGH_RISK_ADJUSTMENT,
            RiskLevel::Moderate => tables::MODERATE_RISK_ADJUSTMENT,
            RiskLevel::Low => 1.0,
        };
        if load_intensity == LoadIntensity::Low {
            adjustment *= tables::LOW_INTENSITY_BOOST;
        }
        adjustment.clamp(tables::MIN_PLATEAU_ADJUSTMENT, tables::MAX_PLATEAU_ADJUSTMENT)
    }

    /// `quantize(last_weight x (1 + total_increment), quantum)`
    #[must_use]
    pub fn suggested_weight(last_weight: f64, total_increment: f64, quantum: f64) -> f64 {
        quantize(last_weight.max(0.0) * (1.0 + total_increment), quantum)
    }

    /// Reps for a goal from the last reps
    #[must_use]
    pub fn suggested_reps(last_reps: u32, goal: TrainingGoal) -> u32 {
        let base = last_reps.clamp(tables::MIN_BASE_REPS, tables::MAX_BASE_REPS);
        match goal {
            TrainingGoal::Strength => {
                let (low, high) = tables::STRENGTH_REP_RANGE;
                Self::scaled_reps(base, tables::STRENGTH_REP_SCALE).clamp(low, high)
            }
            TrainingGoal::FatLoss => {
                let (low, high) = tables::FAT_LOSS_REP_RANGE;
                Self::scaled_reps(base, tables::FAT_LOSS_REP_SCALE).clamp(low, high)
            }
            TrainingGoal::Hypertrophy | TrainingGoal::General => base,
        }
    }

    fn scaled_reps(base: u32, scale: f64) -> u32 {
        (f64::from(base) * scale).round().max(0.0) as u32
    }

    /// Plateau when at least two of the last three session pairs improve under the threshold
    ///
    /// `best_volumes` is the chronological best-set volume of the most recent
    /// sessions; at least two pairs are required.
    #[must_use]
    pub fn local_plateau(best_volumes: &[f64], improvement_threshold: f64) -> bool {
        let pairs: Vec<f64> = best_volumes
            .windows(2)
            .map(|pair| StatisticalAnalyzer::relative_change(pair[0], pair[1]).unwrap_or(0.0))
            .collect();
        if pairs.len() < tables::PLATEAU_MIN_PAIRS {
            return false;
        }
        let recent = &pairs[pairs.len().saturating_sub(3)..];
        recent.iter().filter(|c| **c < improvement_threshold).count() >= tables::PLATEAU_STALLED_PAIRS
    }

    /// Confidence from consistency, risk and recovery efficiency
    #[must_use]
    pub fn confidence(rest_consistency: f64, risk: RiskLevel, recovery_efficiency: f64) -> f64 {
        let mut confidence = tables::BASE_CONFIDENCE;
        if rest_consistency >= tables::CONFIDENCE_CONSISTENCY_THRESHOLD {
            confidence += tables::CONFIDENCE_CONSISTENCY_BONUS;
        }
        match risk {
            RiskLevel::Critical => confidence -= tables::CONFIDENCE_CRITICAL_RISK_PENALTY,
            RiskLevel::High => confidence -= tables::CONFIDENCE_HIGH_RISK_PENALTY,
            RiskLevel::Moderate | RiskLevel::Low => {}
        }
        confidence = tables::CONFIDENCE_RECOVERY_BONUS
            .mul_add(recovery_efficiency.clamp(0.0, 1.0), confidence);
        confidence.clamp(tables::MIN_CONFIDENCE, tables::MAX_CONFIDENCE)
    }

    fn weekly_volume(input: &ProgressionInput<'_>) -> f64 {
        input
            .log
            .exercise_sessions(input.exercise_id)
            .iter()
            .filter(|s| {
                let days_back = (input.as_of - s.date).num_days();
                (0..7).contains(&days_back)
            })
            .map(ExerciseSessionSets::volume)
            .sum()
    }

    fn full_recommendation(
        input: &ProgressionInput<'_>,
        profile: &AthleteProfile,
        context: &TrainingContextSummary,
        last: LastPerformance,
        plateau_detected: bool,
        config: &ProgressionConfig,
    ) -> ProgressionRecommendation {
        let experience = profile.experience.unwrap_or(ExperienceLevel::Beginner);
        let goal = profile.goal.unwrap_or(TrainingGoal::General);
        let weekly_frequency = input
            .weekly_frequency
            .unwrap_or(context.session_metrics.sessions_per_week)
            .clamp(1.0, 7.0);
        let load = &context.training_load;
        let risk = input
            .assessment
            .map_or(load.overtraining_risk, |a| a.risk_level);
        let rest_days = (input.as_of - last.date).num_days().max(0);
        let weekly_volume = Self::weekly_volume(input);

        let base_increment = Self::base_increment(experience, weekly_frequency);
        let volume_multiplier = Self::volume_multiplier(weekly_volume);
        let recovery_factor = Self::recovery_factor(
            rest_days,
            weekly_frequency,
            load.load_intensity,
            load.recovery_demand,
            risk,
        );
        let plateau_adjustment = Self::plateau_adjustment(risk, load.load_intensity);
        let total_increment =
            base_increment * volume_multiplier * recovery_factor * plateau_adjustment;

        let suggested_weight =
            Self::suggested_weight(last.weight, total_increment, config.weight_quantum);
        let suggested_reps = Self::suggested_reps(last.reps, goal);

        let mut reasoning = vec![
            format!(
                "Last top set {:.2} x {} on {}",
                last.weight, last.reps, last.date
            ),
            format!(
                "Base increment {:.1}% for a {experience} lifter training {weekly_frequency:.1}x per week",
                base_increment * 100.0
            ),
            format!(
                "Weekly exercise volume {weekly_volume:.0} gives volume multiplier {volume_multiplier:.2}"
            ),
            format!(
                "{rest_days} rest day(s), {:?} load intensity and {} risk give recovery factor {recovery_factor:.2}",
                load.load_intensity,
                risk.as_str()
            ),
            format!("Risk adjustment {plateau_adjustment:.2}"),
            format!(
                "Total increment {:.2}% for a {goal} goal",
                total_increment * 100.0
            ),
        ];
        if profile.goal.is_none() {
            reasoning.push("No goal on the profile, treating it as general".to_owned());
        }
        if plateau_detected {
            reasoning.push(
                "Best-set volume has barely moved across recent sessions".to_owned(),
            );
        }

        let phase_is_deload = input
            .periodization
            .is_some_and(|p| p.recommendation.phase == TrainingPhase::Deload);
        let plateau_needs_deload = input
            .plateau
            .is_some_and(|p| p.level >= PlateauLevel::Moderate);
        let deload_recommended =
            phase_is_deload || risk == RiskLevel::Critical || plateau_needs_deload;
        if deload_recommended {
            reasoning.push("Deload recommended before pushing the load further".to_owned());
        }

        let alternatives = Self::alternatives(
            last,
            total_increment,
            suggested_reps,
            risk,
            load.load_intensity,
            context.rest_periods.rest_consistency,
            config,
        );

        ProgressionRecommendation {
            exercise_id: input.exercise_id.clone(),
            last_performance: Some(last),
            suggested_weight,
            suggested_reps,
            confidence: Self::confidence(
                context.rest_periods.rest_consistency,
                risk,
                context.recovery.recovery_efficiency,
            ),
            reasoning,
            alternatives,
            plateau_detected,
            deload_recommended,
            used_defaults: false,
            factors: Some(ProgressionFactors {
                base_increment,
                volume_multiplier,
                recovery_factor,
                plateau_adjustment,
                total_increment,
                weekly_volume,
                weekly_frequency,
                rest_days,
            }),
        }
    }

    fn alternatives(
        last: LastPerformance,
        total_increment: f64,
        suggested_reps: u32,
        risk: RiskLevel,
        load_intensity: LoadIntensity,
        rest_consistency: f64,
        config: &ProgressionConfig,
    ) -> Vec<ProgressionAlternative> {
        let mut alternatives = Vec::with_capacity(2);
        if risk != RiskLevel::Low {
            let increment = total_increment * tables::CONSERVATIVE_SHARE;
            alternatives.push(ProgressionAlternative {
                kind: AlternativeKind::Conservative,
                suggested_weight: Self::suggested_weight(
                    last.weight,
                    increment,
                    config.weight_quantum,
                ),
                suggested_reps,
                increment,
                rationale: format!("Smaller step while overtraining risk is {}", risk.as_str()),
            });
        }
        if load_intensity == LoadIntensity::Low
            && rest_consistency >= tables::AGGRESSIVE_MIN_CONSISTENCY
        {
            let increment = total_increment * tables::AGGRESSIVE_SHARE;
            alternatives.push(ProgressionAlternative {
                kind: AlternativeKind::Aggressive,
                suggested_weight: Self::suggested_weight(
                    last.weight,
                    increment,
                    config.weight_quantum,
                ),
                suggested_reps: suggested_reps.saturating_sub(1).max(1),
                increment,
                rationale: "Recent load is low and rest is consistent".to_owned(),
            });
        }
        alternatives
    }

    fn with_defaults(
        input: &ProgressionInput<'_>,
        last: LastPerformance,
        plateau_detected: bool,
        config: &ProgressionConfig,
    ) -> ProgressionRecommendation {
        let missing = match (input.profile.is_some(), input.context.is_some()) {
            (false, _) => "no athlete profile",
            (true, false) => "no training context",
            (true, true) => "no experience level on the profile",
        };
        ProgressionRecommendation {
            exercise_id: input.exercise_id.clone(),
            last_performance: Some(last),
            suggested_weight: Self::suggested_weight(
                last.weight,
                tables::FALLBACK_INCREMENT,
                config.weight_quantum,
            ),
            suggested_reps: last.reps.clamp(tables::MIN_BASE_REPS, tables::MAX_BASE_REPS),
            confidence: tables::FALLBACK_CONFIDENCE,
            reasoning: vec![
                format!("Default progression used: {missing}"),
                format!(
                    "Last top set {:.2} x {} increased by a flat 5%",
                    last.weight, last.reps
                ),
            ],
            alternatives: Vec::new(),
            plateau_detected,
            deload_recommended: input
                .plateau
                .is_some_and(|p| p.level >= PlateauLevel::Moderate),
            used_defaults: true,
            factors: None,
        }
    }

    fn no_history(exercise_id: &ExerciseId) -> ProgressionRecommendation {
        ProgressionRecommendation {
            exercise_id: exercise_id.clone(),
            last_performance: None,
            suggested_weight: 0.0,
            suggested_reps: tables::DEFAULT_REPS,
            confidence: tables::NO_HISTORY_CONFIDENCE,
            reasoning: vec![
                "Default progression used: no recorded sets for this exercise".to_owned(),
                "Pick a starting weight that leaves two reps in reserve".to_owned(),
            ],
            alternatives: Vec::new(),
            plateau_detected: false,
            deload_recommended: false,
            used_defaults: true,
            factors: None,
        }
    }
}
