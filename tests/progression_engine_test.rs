// ABOUTME: Integration tests for per-exercise progression recommendations
// ABOUTME: Covers the factor tables, quantization, local plateaus, defaults and a full scenario
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::training_log::{
    as_of, athlete, days_before, exercise, profile, steady_squat_block, LogBuilder,
};
use ironcoach::intelligence::config::IntelligenceConfig;
use ironcoach::intelligence::fatigue_detection::OvertrainingDetector;
use ironcoach::intelligence::periodization::PeriodizationEngine;
use ironcoach::intelligence::progression_engine::{
    ProgressionEngine, ProgressionInput, ProgressionRecommendation,
};
use ironcoach::intelligence::training_context::TrainingContextAggregator;
use ironcoach::intelligence::types::{LoadIntensity, RiskLevel};
use ironcoach::models::{
    AnalysisWindow, AthleteProfile, ExperienceLevel, TrainingGoal, TrainingLog,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const EXPERIENCE: [ExperienceLevel; 3] = [
    ExperienceLevel::Beginner,
    ExperienceLevel::Intermediate,
    ExperienceLevel::Advanced,
];

/// Run the engine the way the pipeline does: context, detector and phase first
fn recommend(
    log: &TrainingLog,
    exercise_id: &str,
    profile: Option<&AthleteProfile>,
) -> ProgressionRecommendation {
    let config = IntelligenceConfig::default();
    let exercise_id = exercise(exercise_id);
    let context = TrainingContextAggregator::summarize(
        athlete(),
        AnalysisWindow::new(as_of(), config.context.window_weeks),
        log,
        &config.context,
    );
    let assessment = OvertrainingDetector::assess(&context, &config.fatigue);
    let periodization =
        PeriodizationEngine::assess(&context, Some(&assessment), None, &config.periodization);
    let input = ProgressionInput {
        exercise_id: &exercise_id,
        as_of: as_of(),
        log,
        profile,
        weekly_frequency: profile.and_then(|p| p.weekly_frequency),
        context: Some(&context),
        assessment: Some(&assessment),
        periodization: Some(&periodization),
        plateau: None,
    };
    ProgressionEngine::recommend(&input, &config.progression)
}

#[test]
fn test_beginner_hypertrophy_scenario() {
    let athlete_profile = profile(
        Some(ExperienceLevel::Beginner),
        Some(TrainingGoal::Hypertrophy),
        Some(3.0),
    );
    let recommendation = recommend(&steady_squat_block().build(), "squat", Some(&athlete_profile));

    let last = recommendation.last_performance.unwrap();
    assert!((last.weight - 100.0).abs() < f64::EPSILON);
    assert_eq!(last.reps, 8);
    assert_eq!(last.date, days_before(2));

    let factors = recommendation.factors.unwrap();
    assert!((factors.base_increment - 0.065).abs() < 1e-12);
    assert!((factors.weekly_volume - 800.0).abs() < 1e-9);
    assert!((factors.volume_multiplier - 0.976).abs() < 1e-9);
    assert_eq!(factors.rest_days, 2);
    assert!((factors.recovery_factor - 0.95).abs() < 1e-9);
    assert!((factors.plateau_adjustment - 1.0).abs() < 1e-9);

    assert!((recommendation.suggested_weight - 106.0).abs() < 1e-9);
    assert_eq!(recommendation.suggested_reps, 8);
    assert!(!recommendation.used_defaults);
    assert!(!recommendation.plateau_detected);
    assert!(!recommendation.deload_recommended);
    assert!(recommendation.alternatives.is_empty());
    assert!((0.8..=0.95).contains(&recommendation.confidence));
    assert!(recommendation.reasoning.len() >= 6);
}

#[test]
fn test_missing_profile_falls_back_to_five_percent() {
    let recommendation = recommend(&steady_squat_block().build(), "squat", None);

    assert!(recommendation.used_defaults);
    assert!((recommendation.suggested_weight - 105.0).abs() < 1e-9);
    assert_eq!(recommendation.suggested_reps, 8);
    assert!((recommendation.confidence - 0.5).abs() < f64::EPSILON);
    assert!(recommendation.factors.is_none());
    assert!(recommendation.reasoning[0].contains("no athlete profile"));
}

#[test]
fn test_profile_without_experience_falls_back() {
    let athlete_profile = profile(None, Some(TrainingGoal::Strength), Some(3.0));
    let recommendation = recommend(&steady_squat_block().build(), "squat", Some(&athlete_profile));

    assert!(recommendation.used_defaults);
    assert!((recommendation.suggested_weight - 105.0).abs() < 1e-9);
    assert!(recommendation.reasoning[0].contains("no experience level"));
}

#[test]
fn test_unlogged_exercise_gets_starting_recommendation() {
    let athlete_profile = profile(Some(ExperienceLevel::Advanced), None, None);
    let recommendation = recommend(&steady_squat_block().build(), "deadlift", Some(&athlete_profile));

    assert!(recommendation.last_performance.is_none());
    assert!(recommendation.suggested_weight.abs() < f64::EPSILON);
    assert_eq!(recommendation.suggested_reps, 8);
    assert!((recommendation.confidence - 0.3).abs() < f64::EPSILON);
    assert!(recommendation.used_defaults);
}

#[test]
fn test_missing_goal_is_general() {
    let athlete_profile = profile(Some(ExperienceLevel::Intermediate), None, Some(3.0));
    let recommendation = recommend(&steady_squat_block().build(), "squat", Some(&athlete_profile));

    assert!(!recommendation.used_defaults);
    assert_eq!(recommendation.suggested_reps, 8);
    assert!(recommendation
        .reasoning
        .iter()
        .any(|line| line.contains("treating it as general")));
}

#[test]
fn test_base_increment_stays_in_table_range() {
    for experience in EXPERIENCE {
        for step in 0..=24 {
            let frequency = f64::from(step).mul_add(0.25, 1.0);
            let increment = ProgressionEngine::base_increment(experience, frequency);
            assert!(
                (0.015..=0.10).contains(&increment),
                "{experience} at {frequency}/week gave {increment}"
            );
        }
    }
    assert!((ProgressionEngine::base_increment(ExperienceLevel::Beginner, 2.0) - 0.10).abs() < 1e-12);
    assert!((ProgressionEngine::base_increment(ExperienceLevel::Beginner, 2.5) - 0.065).abs() < 1e-12);
    assert!((ProgressionEngine::base_increment(ExperienceLevel::Advanced, 5.0) - 0.015).abs() < 1e-12);
}

#[test]
fn test_factor_bounds_under_random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(2025);
    let intensities = [
        LoadIntensity::Low,
        LoadIntensity::Moderate,
        LoadIntensity::High,
        LoadIntensity::VeryHigh,
    ];
    let risks = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    for _ in 0..5000 {
        let intensity = intensities[rng.gen_range(0..intensities.len())];
        let risk = risks[rng.gen_range(0..risks.len())];

        let volume = ProgressionEngine::volume_multiplier(rng.gen_range(-1000.0..100_000.0));
        assert!((0.7..=1.0).contains(&volume), "volume multiplier {volume}");

        let recovery = ProgressionEngine::recovery_factor(
            rng.gen_range(-3..30),
            rng.gen_range(1.0..7.0),
            intensity,
            rng.gen_range(0.0..100.0),
            risk,
        );
        assert!((0.5..=1.3).contains(&recovery), "recovery factor {recovery}");

        let adjustment = ProgressionEngine::plateau_adjustment(risk, intensity);
        assert!((0.5..=1.2).contains(&adjustment), "plateau adjustment {adjustment}");

        let confidence = ProgressionEngine::confidence(
            rng.gen_range(-50.0..150.0),
            risk,
            rng.gen_range(-1.0..2.0),
        );
        assert!((0.3..=0.95).contains(&confidence), "confidence {confidence}");
    }
}

#[test]
fn test_suggested_weight_is_a_quantum_multiple() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let quanta = [0.25, 0.5, 1.0, 1.25, 2.5];

    for _ in 0..5000 {
        let quantum = quanta[rng.gen_range(0..quanta.len())];
        let last_weight = rng.gen_range(-20.0..400.0);
        let increment = rng.gen_range(-0.2..0.2);

        let weight = ProgressionEngine::suggested_weight(last_weight, increment, quantum);
        assert!(weight >= 0.0, "negative weight {weight}");
        let steps = weight / quantum;
        assert!(
            (steps - steps.round()).abs() < 1e-6,
            "{weight} is not a multiple of {quantum}"
        );
    }
    assert!(ProgressionEngine::suggested_weight(f64::NAN, 0.05, 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_local_plateau_needs_two_stalled_pairs() {
    let threshold = IntelligenceConfig::default()
        .progression
        .plateau_improvement_threshold;

    assert!(ProgressionEngine::local_plateau(&[100.0, 101.0, 101.5, 101.8], threshold));
    assert!(ProgressionEngine::local_plateau(&[100.0, 110.0, 111.0, 111.5], threshold));
    assert!(!ProgressionEngine::local_plateau(&[100.0, 110.0, 121.0, 122.0], threshold));
    assert!(!ProgressionEngine::local_plateau(&[100.0, 100.0], threshold));
    assert!(ProgressionEngine::local_plateau(&[100.0, 100.0, 100.0], threshold));
}

#[test]
fn test_flat_best_sets_detect_plateau() {
    let log = [20, 14, 7, 2]
        .into_iter()
        .fold(LogBuilder::new(), |builder, days_back| {
            builder.session(days_back, "squat", &[(100.0, 8), (100.0, 8)])
        })
        .build();
    let athlete_profile = profile(Some(ExperienceLevel::Intermediate), None, Some(2.0));
    let recommendation = recommend(&log, "squat", Some(&athlete_profile));

    assert!(recommendation.plateau_detected);
    assert!(recommendation
        .reasoning
        .iter()
        .any(|line| line.contains("barely moved")));
}

#[test]
fn test_goal_shapes_reps() {
    assert_eq!(ProgressionEngine::suggested_reps(8, TrainingGoal::Strength), 6);
    assert_eq!(ProgressionEngine::suggested_reps(8, TrainingGoal::FatLoss), 12);
    assert_eq!(ProgressionEngine::suggested_reps(8, TrainingGoal::Hypertrophy), 8);
    assert_eq!(ProgressionEngine::suggested_reps(3, TrainingGoal::General), 6);
    assert_eq!(ProgressionEngine::suggested_reps(15, TrainingGoal::FatLoss), 14);
}

#[test]
fn test_critical_risk_recommends_deload() {
    let log = helpers::training_log::three_per_week(8)
        .into_iter()
        .fold(LogBuilder::new(), |builder, days_back| {
            let sets: &[(f64, u32)] = if days_back < 14 {
                &[(100.0, 8), (100.0, 8), (100.0, 8)]
            } else {
                &[(100.0, 8)]
            };
            builder.session(days_back, "squat", sets)
        })
        .build();
    let athlete_profile = profile(
        Some(ExperienceLevel::Intermediate),
        Some(TrainingGoal::Strength),
        Some(3.0),
    );
    let recommendation = recommend(&log, "squat", Some(&athlete_profile));

    assert!(recommendation.deload_recommended);
    let factors = recommendation.factors.unwrap();
    assert!(factors.recovery_factor < 0.95);
    assert!((factors.plateau_adjustment - 0.7).abs() < 1e-9);
    assert!(recommendation
        .alternatives
        .iter()
        .all(|a| a.increment < factors.total_increment));
    assert!(!recommendation.alternatives.is_empty());
}
