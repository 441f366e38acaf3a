// ABOUTME: Overtraining and fatigue pattern detection over the per-session volume series
// ABOUTME: Names acute, chronic, stall, decline and inconsistent-recovery patterns with severity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Overtraining & Fatigue Pattern Detector
//!
//! Each pattern is evaluated independently against the chronological session
//! volumes of a [`TrainingContextSummary`]. The aggregate risk starts from the
//! load-model score and adds a fixed number of points per matched pattern:
//!
//! | severity | points |
//! |---|---|
//! | critical | 25 |
//! | high | 15 |
//! | moderate | 8 |
//! | low | 3 |

use chrono::NaiveDate;
use ironcoach_core::models::AthleteId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FatigueConfig;
use crate::constants::{fatigue, risk};
use crate::statistical_analysis::{clamp_unit, StatisticalAnalyzer};
use crate::training_context::TrainingContextSummary;
use crate::types::{RiskLevel, Severity, Trend};

/// Fatigue pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatiguePatternKind {
    /// Last 3 sessions well below the previous 3
    AcuteFatigue,
    /// Last 8 sessions below the previous 8
    ChronicFatigue,
    /// Consecutive sessions each dropping from their predecessor
    RecoveryStall,
    /// Negative volume trend across the window
    PerformanceDecline,
    /// Highly variable rest gaps
    InconsistentRecovery,
}

impl FatiguePatternKind {
    /// Stable snake_case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AcuteFatigue => "acute_fatigue",
            Self::ChronicFatigue => "chronic_fatigue",
            Self::RecoveryStall => "recovery_stall",
            Self::PerformanceDecline => "performance_decline",
            Self::InconsistentRecovery => "inconsistent_recovery",
        }
    }
}

/// A detected fatigue pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatiguePattern {
    /// Pattern type
    pub kind: FatiguePatternKind,
    /// Severity banded on `magnitude`
    pub severity: Severity,
    /// 0.3-0.95
    pub confidence: f64,
    /// Date of the first session that shows the pattern
    pub first_detected: NaiveDate,
    /// Direction over the most recent sessions
    pub trend: Trend,
    /// Drop ratio, normalized slope, run length or gap CV depending on `kind`
    pub magnitude: f64,
    /// Human-readable explanation
    pub description: String,
}

/// A ranked corrective action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    /// Higher is more urgent
    pub priority: u8,
    /// What to do
    pub action: String,
}

/// Detector output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertrainingAssessment {
    /// Athlete assessed
    pub athlete_id: AthleteId,
    /// Reference date of the underlying window
    pub as_of: NaiveDate,
    /// Load-model score from the training context
    pub load_risk_score: f64,
    /// 0-100 aggregate score
    pub risk_score: f64,
    /// Category of `risk_score`
    pub risk_level: RiskLevel,
    /// Detected patterns, most severe first
    pub patterns: Vec<FatiguePattern>,
    /// Actions ordered by descending priority without duplicates
    pub recommended_actions: Vec<RecommendedAction>,
    /// Days until the assessment should be repeated
    pub reassess_in_days: u32,
    /// True when fewer sessions than the pattern minimum were available
    pub insufficient_data: bool,
}

impl OvertrainingAssessment {
    /// Whether a pattern of `kind` was detected
    #[must_use]
    pub fn has_pattern(&self, kind: FatiguePatternKind) -> bool {
        self.patterns.iter().any(|p| p.kind == kind)
    }

    /// The detected pattern of `kind`, if any
    #[must_use]
    pub fn pattern(&self, kind: FatiguePatternKind) -> Option<&FatiguePattern> {
        self.patterns.iter().find(|p| p.kind == kind)
    }
}

/// Overtraining and fatigue pattern detector
pub struct OvertrainingDetector;

impl OvertrainingDetector {
    /// Assess overtraining risk for a training context
    #[must_use]
    pub fn assess(summary: &TrainingContextSummary, config: &FatigueConfig) -> OvertrainingAssessment {
        let load_risk_score = summary.training_load.risk_score;
        let volumes = &summary.session_metrics.session_volumes;

        if volumes.len() < config.min_sessions {
            debug!(
                athlete_id = %summary.athlete_id,
                sessions = volumes.len(),
                required = config.min_sessions,
                "Too few sessions for fatigue patterns, using load model only"
            );
            return Self::assessment(summary, load_risk_score, Vec::new(), true);
        }

        let series: Vec<f64> = volumes.iter().map(|s| s.volume).collect();
        let dates: Vec<NaiveDate> = volumes.iter().map(|s| s.date).collect();

        let mut patterns: Vec<FatiguePattern> = [
            Self::detect_acute_fatigue(&series, &dates, config),
            Self::detect_chronic_fatigue(&series, &dates, config),
            Self::detect_recovery_stall(&series, &dates, config),
            Self::detect_performance_decline(&series, &dates, config),
            Self::detect_inconsistent_recovery(&summary.rest_periods.gaps, &dates, config),
        ]
        .into_iter()
        .flatten()
        .collect();
        patterns.sort_by(|a, b| b.severity.cmp(&a.severity));

        Self::assessment(summary, load_risk_score, patterns, false)
    }

    fn assessment(
        summary: &TrainingContextSummary,
        load_risk_score: f64,
        patterns: Vec<FatiguePattern>,
        insufficient_data: bool,
    ) -> OvertrainingAssessment {
        let risk_score = Self::risk_score(load_risk_score, &patterns);
        let risk_level = RiskLevel::from_score(risk_score);

        OvertrainingAssessment {
            athlete_id: summary.athlete_id,
            as_of: summary.window.as_of,
            load_risk_score,
            risk_score,
            risk_level,
            recommended_actions: Self::recommended_actions(risk_level, &patterns),
            reassess_in_days: Self::reassess_in_days(risk_level),
            patterns,
            insufficient_data,
        }
    }

    /// `clamp(load_score + sum of severity weights, 0, 100)`
    #[must_use]
    pub fn risk_score(load_risk_score: f64, patterns: &[FatiguePattern]) -> f64 {
        let pattern_points: f64 = patterns.iter().map(|p| p.severity.risk_weight()).sum();
        let score = load_risk_score + pattern_points;
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, risk::MAX_SCORE)
        }
    }

    /// Fixed reassessment horizon per risk level
    #[must_use]
    pub const fn reassess_in_days(risk_level: RiskLevel) -> u32 {
        match risk_level {
            RiskLevel::Critical => fatigue::REASSESS_CRITICAL_DAYS,
            RiskLevel::High => fatigue::REASSESS_HIGH_DAYS,
            RiskLevel::Moderate => fatigue::REASSESS_MODERATE_DAYS,
            RiskLevel::Low => fatigue::REASSESS_LOW_DAYS,
        }
    }

    fn confidence(sessions: usize, excess: f64) -> f64 {
        let sample_factor = (sessions as f64 / fatigue::FULL_CONFIDENCE_SESSIONS).min(1.0);
        let evidence = clamp_unit(excess);
        0.3f64
            .mul_add(sample_factor, 0.25f64.mul_add(evidence, 0.4))
            .clamp(fatigue::MIN_CONFIDENCE, fatigue::MAX_CONFIDENCE)
    }

    /// How far `magnitude` exceeds `threshold`, relative to the threshold
    fn excess(magnitude: f64, threshold: f64) -> f64 {
        if threshold <= 0.0 {
            return 1.0;
        }
        (magnitude - threshold) / threshold
    }

    /// Last session against the mean of the last three
    fn recent_trend(series: &[f64]) -> Trend {
        let Some(last) = series.last() else {
            return Trend::Stable;
        };
        let tail = &series[series.len().saturating_sub(fatigue::ACUTE_BLOCK_SESSIONS)..];
        let average = StatisticalAnalyzer::mean(tail);
        if average <= 0.0 {
            return Trend::Stable;
        }
        if *last < average * (1.0 - fatigue::PATTERN_TREND_THRESHOLD) {
            Trend::Worsening
        } else if *last > average * (1.0 + fatigue::PATTERN_TREND_THRESHOLD) {
            Trend::Improving
        } else {
            Trend::Stable
        }
    }

    /// Relative drop of the last `block` sessions against the `block` before them
    fn block_drop(series: &[f64], block: usize) -> Option<f64> {
        if series.len() < 2 * block {
            return None;
        }
        let recent = &series[series.len() - block..];
        let previous = &series[series.len() - 2 * block..series.len() - block];
        let previous_mean = StatisticalAnalyzer::mean(previous);
        StatisticalAnalyzer::relative_change(previous_mean, StatisticalAnalyzer::mean(recent))
            .map(|change| -change)
    }

    fn detect_acute_fatigue(
        series: &[f64],
        dates: &[NaiveDate],
        config: &FatigueConfig,
    ) -> Option<FatiguePattern> {
        let block = fatigue::ACUTE_BLOCK_SESSIONS;
        let drop = Self::block_drop(series, block)?;
        if drop <= config.acute_volume_drop {
            return None;
        }
        Some(FatiguePattern {
            kind: FatiguePatternKind::AcuteFatigue,
            severity: Severity::from_bands(drop, fatigue::ACUTE_SEVERITY_BANDS),
            confidence: Self::confidence(series.len(), Self::excess(drop, config.acute_volume_drop)),
            first_detected: dates[dates.len() - block],
            trend: Self::recent_trend(series),
            magnitude: drop,
            description: format!(
                "Average volume of the last {block} sessions is {:.0}% below the {block} before",
                drop * 100.0
            ),
        })
    }

    fn detect_chronic_fatigue(
        series: &[f64],
        dates: &[NaiveDate],
        config: &FatigueConfig,
    ) -> Option<FatiguePattern> {
        let block = fatigue::CHRONIC_BLOCK_SESSIONS;
        let drop = Self::block_drop(series, block)?;
        if drop <= config.chronic_volume_drop {
            return None;
        }
        Some(FatiguePattern {
            kind: FatiguePatternKind::ChronicFatigue,
            severity: Severity::from_bands(drop, fatigue::CHRONIC_SEVERITY_BANDS),
            confidence: Self::confidence(
                series.len(),
                Self::excess(drop, config.chronic_volume_drop),
            ),
            first_detected: dates[dates.len() - block],
            trend: Self::recent_trend(series),
            magnitude: drop,
            description: format!(
                "Sustained {:.0}% volume drop over the last {block} sessions",
                drop * 100.0
            ),
        })
    }

    /// Longest run of consecutive sessions each dropping more than the stall threshold
    ///
    /// Returns `(start index of the first dropping session, run length, mean drop)`.
    fn longest_stall_run(series: &[f64], threshold: f64) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        let mut start = 0;
        let mut length = 0;
        let mut drop_sum = 0.0;

        for (i, pair) in series.windows(2).enumerate() {
            let dropped = StatisticalAnalyzer::relative_change(pair[0], pair[1])
                .filter(|change| -change > threshold);
            if let Some(change) = dropped {
                if length == 0 {
                    start = i + 1;
                    drop_sum = 0.0;
                }
                length += 1;
                drop_sum -= change;
                if best.is_none_or(|(_, best_len, _)| length >= best_len) {
                    best = Some((start, length, drop_sum / length as f64));
                }
            } else {
                length = 0;
            }
        }
        best
    }

    fn detect_recovery_stall(
        series: &[f64],
        dates: &[NaiveDate],
        config: &FatigueConfig,
    ) -> Option<FatiguePattern> {
        let (start, run, mean_drop) = Self::longest_stall_run(series, config.recovery_stall_drop)?;
        if run < fatigue::MIN_STALL_RUN {
            return None;
        }
        let [moderate, high, critical] = fatigue::STALL_SEVERITY_RUNS;
        let severity = if run >= critical {
            Severity::Critical
        } else if run >= high {
            Severity::High
        } else if run >= moderate {
            Severity::Moderate
        } else {
            Severity::Low
        };
        let ongoing = start + run == series.len();

        Some(FatiguePattern {
            kind: FatiguePatternKind::RecoveryStall,
            severity,
            confidence: Self::confidence(
                series.len(),
                (run - fatigue::MIN_STALL_RUN + 1) as f64 / 3.0,
            ),
            first_detected: dates[start],
            trend: if ongoing {
                Trend::Worsening
            } else {
                Trend::Improving
            },
            magnitude: run as f64,
            description: format!(
                "{run} consecutive sessions each dropped volume (average {:.0}%) from the one before",
                mean_drop * 100.0
            ),
        })
    }

    fn detect_performance_decline(
        series: &[f64],
        dates: &[NaiveDate],
        config: &FatigueConfig,
    ) -> Option<FatiguePattern> {
        let regression = StatisticalAnalyzer::linear_regression(series)?;
        let normalized = regression.normalized_slope(StatisticalAnalyzer::mean(series))?;
        if regression.slope >= 0.0 || normalized.abs() <= config.decline_normalized_slope {
            return None;
        }
        let magnitude = normalized.abs();

        let half = &series[series.len() / 2..];
        let trend = match StatisticalAnalyzer::normalized_slope(half) {
            Some(recent) if recent >= 0.0 => Trend::Improving,
            Some(recent) if recent < normalized => Trend::Worsening,
            _ => Trend::Stable,
        };

        Some(FatiguePattern {
            kind: FatiguePatternKind::PerformanceDecline,
            severity: Severity::from_bands(magnitude, fatigue::DECLINE_SEVERITY_BANDS),
            confidence: Self::confidence(series.len(), regression.r_squared),
            first_detected: dates[0],
            trend,
            magnitude,
            description: format!(
                "Session volume trends down {:.1}% per session (r\u{b2} {:.2})",
                magnitude * 100.0,
                regression.r_squared
            ),
        })
    }

    fn detect_inconsistent_recovery(
        gaps: &[i64],
        dates: &[NaiveDate],
        config: &FatigueConfig,
    ) -> Option<FatiguePattern> {
        if gaps.len() < fatigue::MIN_GAPS_FOR_RECOVERY_CHECK {
            return None;
        }
        let as_f64: Vec<f64> = gaps.iter().map(|g| *g as f64).collect();
        let cv = StatisticalAnalyzer::coefficient_of_variation(&as_f64)?;
        if cv <= config.inconsistent_recovery_cv {
            return None;
        }

        let (first, second) = as_f64.split_at(as_f64.len() / 2);
        let first_cv = StatisticalAnalyzer::coefficient_of_variation(first).unwrap_or(0.0);
        let second_cv = StatisticalAnalyzer::coefficient_of_variation(second).unwrap_or(0.0);
        let trend = if second_cv > first_cv * (1.0 + fatigue::PATTERN_TREND_THRESHOLD) {
            Trend::Worsening
        } else if second_cv < first_cv * (1.0 - fatigue::PATTERN_TREND_THRESHOLD) {
            Trend::Improving
        } else {
            Trend::Stable
        };

        Some(FatiguePattern {
            kind: FatiguePatternKind::InconsistentRecovery,
            severity: Severity::from_bands(cv, fatigue::INCONSISTENCY_SEVERITY_BANDS),
            confidence: Self::confidence(
                gaps.len() + 1,
                Self::excess(cv, config.inconsistent_recovery_cv),
            ),
            first_detected: dates[0],
            trend,
            magnitude: cv,
            description: format!(
                "Rest gaps vary by {:.0}% around their mean",
                cv * 100.0
            ),
        })
    }

    fn pattern_action(pattern: &FatiguePattern) -> &'static str {
        match pattern.kind {
            FatiguePatternKind::AcuteFatigue => {
                "Reduce volume by 20-30% for the next 3 sessions and add a rest day"
            }
            FatiguePatternKind::ChronicFatigue => {
                "Schedule a deload week at roughly half the usual volume"
            }
            FatiguePatternKind::RecoveryStall => {
                "Extend rest between sessions until session volume stabilizes"
            }
            FatiguePatternKind::PerformanceDecline => {
                "Hold weights steady and review sleep, nutrition and stress"
            }
            FatiguePatternKind::InconsistentRecovery => {
                "Train on a fixed weekly schedule to even out rest days"
            }
        }
    }

    const fn severity_priority(severity: Severity) -> u8 {
        match severity {
            Severity::Critical => 90,
            Severity::High => 70,
            Severity::Moderate => 50,
            Severity::Low => 30,
        }
    }

    fn recommended_actions(
        risk_level: RiskLevel,
        patterns: &[FatiguePattern],
    ) -> Vec<RecommendedAction> {
        let mut actions: Vec<RecommendedAction> = patterns
            .iter()
            .map(|p| RecommendedAction {
                priority: Self::severity_priority(p.severity),
                action: Self::pattern_action(p).to_owned(),
            })
            .collect();

        let general = match risk_level {
            RiskLevel::Critical => Some((100, "Stop progressive overload and take a full deload")),
            RiskLevel::High => Some((80, "Cut training volume and avoid adding weight this week")),
            RiskLevel::Moderate => Some((40, "Keep loads steady and monitor recovery")),
            RiskLevel::Low => None,
        };
        if let Some((priority, action)) = general {
            actions.push(RecommendedAction {
                priority,
                action: action.to_owned(),
            });
        }
        if actions.is_empty() {
            actions.push(RecommendedAction {
                priority: 10,
                action: "Continue the current plan".to_owned(),
            });
        }

        actions.sort_by(|a, b| b.priority.cmp(&a.priority));
        let mut seen = std::collections::HashSet::new();
        actions.retain(|a| seen.insert(a.action.clone()));
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stall_run_finds_longest_sequence() {
        let series = [100.0, 80.0, 60.0, 65.0, 50.0, 40.0, 30.0];
        let (start, run, _) = OvertrainingDetector::longest_stall_run(&series, 0.15).unwrap_or_default();
        assert_eq!((start, run), (4, 3));
    }

    #[test]
    fn test_block_drop_needs_two_blocks() {
        assert!(OvertrainingDetector::block_drop(&[1.0, 2.0, 3.0], 3).is_none());
        let drop = OvertrainingDetector::block_drop(&[10.0, 10.0, 10.0, 7.0, 7.0, 7.0], 3);
        assert!(drop.is_some_and(|d| (d - 0.3).abs() < 1e-9));
    }
}
