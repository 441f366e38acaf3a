// ABOUTME: Integration tests for overtraining and fatigue pattern detection
// ABOUTME: Covers acute fatigue, recovery stalls, inconsistent rest and risk aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use chrono::Duration;
use helpers::training_log::{as_of, athlete, days_before, steady_squat_block, LogBuilder};
use ironcoach::intelligence::config::IntelligenceConfig;
use ironcoach::intelligence::fatigue_detection::{
    FatiguePattern, FatiguePatternKind, OvertrainingAssessment, OvertrainingDetector,
};
use ironcoach::intelligence::training_context::TrainingContextAggregator;
use ironcoach::intelligence::types::{RiskLevel, Severity, Trend};
use ironcoach::models::{AnalysisWindow, TrainingLog};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn assess(log: &TrainingLog) -> OvertrainingAssessment {
    let config = IntelligenceConfig::default();
    let summary = TrainingContextAggregator::summarize(
        athlete(),
        AnalysisWindow::new(as_of(), config.context.window_weeks),
        log,
        &config.context,
    );
    OvertrainingDetector::assess(&summary, &config.fatigue)
}

/// One session every other day with the given loads at 10 reps
fn every_other_day(weights: &[f64]) -> LogBuilder {
    let last = i64::try_from(weights.len()).unwrap() - 1;
    weights
        .iter()
        .enumerate()
        .fold(LogBuilder::new(), |builder, (i, weight)| {
            let days_back = (last - i64::try_from(i).unwrap()) * 2;
            builder.session(days_back, "squat", &[(*weight, 10)])
        })
}

fn assert_actions_ranked(assessment: &OvertrainingAssessment) {
    let priorities: Vec<u8> = assessment
        .recommended_actions
        .iter()
        .map(|a| a.priority)
        .collect();
    let mut sorted = priorities.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(priorities, sorted);

    let mut actions: Vec<&str> = assessment
        .recommended_actions
        .iter()
        .map(|a| a.action.as_str())
        .collect();
    let total = actions.len();
    actions.sort_unstable();
    actions.dedup();
    assert_eq!(actions.len(), total, "duplicate actions");
}

#[test]
fn test_monotonic_drop_flags_acute_fatigue() {
    let log = every_other_day(&[100.0, 95.0, 90.0, 70.0, 65.0, 60.0]).build();
    let assessment = assess(&log);

    assert!(!assessment.insufficient_data);
    let acute = assessment
        .pattern(FatiguePatternKind::AcuteFatigue)
        .expect("acute fatigue should be detected");
    assert!(matches!(acute.severity, Severity::Moderate | Severity::High));
    assert!(acute.magnitude > 0.20);
    assert_eq!(acute.first_detected, days_before(4));
    assert!((0.3..=0.95).contains(&acute.confidence));
    assert!(assessment.has_pattern(FatiguePatternKind::PerformanceDecline));
    assert!(assessment.risk_level >= RiskLevel::Moderate);
    assert_actions_ranked(&assessment);
}

#[test]
fn test_acute_drop_just_past_threshold_is_at_least_moderate() {
    let cases: [(&[f64], f64); 2] = [
        (&[100.0, 98.0, 96.0, 75.0, 74.0, 73.0], 24.0 / 98.0),
        (&[100.0, 95.0, 90.0, 72.0, 70.0, 68.0], 25.0 / 95.0),
    ];
    for (weights, expected_drop) in cases {
        let assessment = assess(&every_other_day(weights).build());
        let acute = assessment
            .pattern(FatiguePatternKind::AcuteFatigue)
            .expect("a drop above 20% should be acute fatigue");
        assert!(
            (acute.magnitude - expected_drop).abs() < 1e-9,
            "magnitude {}",
            acute.magnitude
        );
        assert!(
            matches!(acute.severity, Severity::Moderate | Severity::High),
            "{weights:?} graded {:?}",
            acute.severity
        );
    }
}

/// Sixteen sessions every other day: eight at `before`, then eight at `after`
fn two_blocks(before: f64, after: f64) -> LogBuilder {
    let weights: Vec<f64> = std::iter::repeat(before)
        .take(8)
        .chain(std::iter::repeat(after).take(8))
        .collect();
    every_other_day(&weights)
}

#[test]
fn test_sustained_drop_flags_chronic_fatigue() {
    let assessment = assess(&two_blocks(100.0, 80.0).build());

    let chronic = assessment
        .pattern(FatiguePatternKind::ChronicFatigue)
        .expect("a 20% drop across eight sessions should be chronic fatigue");
    assert!((chronic.magnitude - 0.2).abs() < 1e-9);
    assert_eq!(chronic.severity, Severity::Moderate);
    assert_eq!(chronic.first_detected, days_before(14));
    assert!((0.3..=0.95).contains(&chronic.confidence));
    assert!(!assessment.has_pattern(FatiguePatternKind::AcuteFatigue));
}

#[test]
fn test_small_sustained_drop_is_not_chronic_fatigue() {
    let assessment = assess(&two_blocks(100.0, 90.0).build());

    assert!(!assessment.insufficient_data);
    assert!(!assessment.has_pattern(FatiguePatternKind::ChronicFatigue));
}

#[test]
fn test_chronic_fatigue_needs_sixteen_sessions() {
    let weights: Vec<f64> = std::iter::repeat(100.0)
        .take(7)
        .chain(std::iter::repeat(60.0).take(8))
        .collect();
    let assessment = assess(&every_other_day(&weights).build());

    assert!(!assessment.has_pattern(FatiguePatternKind::ChronicFatigue));
}

#[test]
fn test_too_few_sessions_uses_load_model_only() {
    let log = every_other_day(&[100.0, 80.0, 60.0, 40.0, 20.0]).build();
    let assessment = assess(&log);

    assert!(assessment.insufficient_data);
    assert!(assessment.patterns.is_empty());
    assert!((assessment.risk_score - assessment.load_risk_score).abs() < f64::EPSILON);
}

#[test]
fn test_new_athlete_is_low_risk() {
    let assessment = assess(&TrainingLog::default());

    assert!(assessment.insufficient_data);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(assessment.reassess_in_days, 14);
    assert_eq!(assessment.recommended_actions.len(), 1);
    assert_eq!(
        assessment.recommended_actions[0].action,
        "Continue the current plan"
    );
}

#[test]
fn test_steady_training_has_no_patterns() {
    let assessment = assess(&steady_squat_block().build());

    assert!(assessment.patterns.is_empty());
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert_eq!(assessment.as_of, as_of());
}

#[test]
fn test_consecutive_drops_form_a_recovery_stall() {
    let log = every_other_day(&[100.0, 100.0, 100.0, 100.0, 80.0, 64.0, 50.0]).build();
    let assessment = assess(&log);

    let stall = assessment
        .pattern(FatiguePatternKind::RecoveryStall)
        .expect("three dropping sessions should stall");
    assert!((stall.magnitude - 3.0).abs() < f64::EPSILON);
    assert_eq!(stall.severity, Severity::High);
    assert_eq!(stall.trend, Trend::Worsening);
    assert_eq!(stall.first_detected, days_before(4));
}

#[test]
fn test_erratic_rest_is_inconsistent_recovery() {
    let log = [40, 39, 38, 30, 29, 16, 15, 1, 0]
        .into_iter()
        .fold(LogBuilder::new(), |builder, days_back| {
            builder.session(days_back, "squat", &[(100.0, 8)])
        })
        .build();
    let assessment = assess(&log);

    let pattern = assessment
        .pattern(FatiguePatternKind::InconsistentRecovery)
        .expect("gaps of 1 to 14 days should be inconsistent");
    assert!(pattern.magnitude > 0.6);
    assert_eq!(pattern.first_detected, as_of() - Duration::days(40));
}

#[test]
fn test_patterns_sorted_by_severity() {
    let log = every_other_day(&[
        120.0, 118.0, 115.0, 110.0, 108.0, 100.0, 95.0, 90.0, 70.0, 60.0, 50.0, 40.0,
    ])
    .build();
    let assessment = assess(&log);

    let severities: Vec<Severity> = assessment.patterns.iter().map(|p| p.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(severities, sorted);
    assert_actions_ranked(&assessment);
}

#[test]
fn test_risk_score_is_clamped() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let template = FatiguePattern {
        kind: FatiguePatternKind::AcuteFatigue,
        severity: Severity::Critical,
        confidence: 0.9,
        first_detected: as_of(),
        trend: Trend::Worsening,
        magnitude: 0.7,
        description: String::new(),
    };
    let severities = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Critical,
    ];

    for _ in 0..1000 {
        let load_risk = rng.gen_range(-50.0..150.0);
        let count = rng.gen_range(0..8);
        let patterns: Vec<FatiguePattern> = (0..count)
            .map(|_| FatiguePattern {
                severity: severities[rng.gen_range(0..severities.len())],
                ..template.clone()
            })
            .collect();
        let score = OvertrainingDetector::risk_score(load_risk, &patterns);
        assert!((0.0..=100.0).contains(&score), "score {score}");
    }
    assert!(OvertrainingDetector::risk_score(f64::NAN, &[]).abs() < f64::EPSILON);
}

#[test]
fn test_reassessment_horizon_per_level() {
    assert_eq!(OvertrainingDetector::reassess_in_days(RiskLevel::Critical), 7);
    assert_eq!(OvertrainingDetector::reassess_in_days(RiskLevel::High), 5);
    assert_eq!(OvertrainingDetector::reassess_in_days(RiskLevel::Moderate), 10);
    assert_eq!(OvertrainingDetector::reassess_in_days(RiskLevel::Low), 14);
}
