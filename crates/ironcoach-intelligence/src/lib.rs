// ABOUTME: Training intelligence engine for strength training logs
// ABOUTME: Context aggregation, overtraining detection, periodization, progression and plateau analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![deny(unsafe_code)]

//! # `IronCoach` Intelligence
//!
//! Pure analysis over an athlete's training log. Every analyzer is a
//! deterministic function of its inputs and the reference date; nothing in
//! this crate performs I/O.
//!
//! The pipeline runs bottom-up:
//!
//! 1. [`TrainingContextAggregator`] condenses a trailing window of sessions
//!    into session, rest, load and recovery metrics.
//! 2. [`OvertrainingDetector`] scans the context for fatigue patterns and
//!    scores overtraining risk.
//! 3. [`PeriodizationEngine`] selects and tracks the training phase.
//! 4. [`ProgressionEngine`] suggests the next working weight and reps for an
//!    exercise.
//! 5. [`PlateauAnalyzer`] runs the slower long-horizon plateau analysis and
//!    prescribes deloads.

/// Analyzer thresholds and environment overrides
pub mod config;
/// Constant tables shared by the analyzers
pub mod constants;
/// Overtraining and fatigue pattern detection
pub mod fatigue_detection;
/// Training phase selection and tracking
pub mod periodization;
/// Long-horizon plateau analysis and deload prescriptions
pub mod plateau_analyzer;
/// Next-session weight and rep suggestions
pub mod progression_engine;
/// Regression and descriptive statistics
pub mod statistical_analysis;
/// Trailing-window training context
pub mod training_context;
/// Weekly training frequency resolution
pub mod training_frequency;
/// Shared classification types
pub mod types;

pub use config::{
    ConfigError, ContextConfig, FatigueConfig, IntelligenceConfig, PeriodizationConfig,
    PlateauConfig, ProgressionConfig,
};
pub use fatigue_detection::{
    FatiguePattern, FatiguePatternKind, OvertrainingAssessment, OvertrainingDetector,
    RecommendedAction,
};
pub use periodization::{
    PeriodizationAssessment, PeriodizationEngine, PhaseCharacteristics, PhaseRecommendation,
    PhaseSignals, PhaseSource, PhaseState, TrainingPhase, TransitionRisk,
};
pub use plateau_analyzer::{
    DeloadRecommendation, DeloadType, PlateauAnalysis, PlateauAnalyzer, PlateauFactor,
    PlateauFactorKind, PlateauInput, PlateauLevel,
};
pub use progression_engine::{
    LastPerformance, ProgressionEngine, ProgressionInput, ProgressionRecommendation,
};
pub use statistical_analysis::{RegressionResult, StatisticalAnalyzer};
pub use training_context::{
    RecoveryStatus, TrainingContextAggregator, TrainingContextSummary, TrainingLoadMetrics,
};
pub use training_frequency::{derive_weekly_frequency, resolve_weekly_frequency};
pub use types::{LoadIntensity, RestPeriodTrend, RiskLevel, Severity, Trend};
