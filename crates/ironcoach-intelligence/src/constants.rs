// ABOUTME: Named threshold tables for load scoring, fatigue patterns, phases and progression
// ABOUTME: Empirically chosen heuristics; tunable ones are mirrored in IntelligenceConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Heuristic constants for the training intelligence engine
//!
//! None of these values has a documented derivation. The cutoffs that
//! operators are expected to tune (window lengths, volume-drop thresholds,
//! weight quantum) are defaults for [`crate::config::IntelligenceConfig`];
//! the rest are fixed tables looked up by the analyzers.

/// Optimal rest between sessions, keyed on sessions per week
pub mod rest_days {
    /// Sessions per week at and above which `OPTIMAL_REST_HIGH_FREQUENCY` applies
    pub const HIGH_FREQUENCY_SESSIONS: f64 = 5.0;
    /// Sessions per week at and above which `OPTIMAL_REST_MODERATE_FREQUENCY` applies
    pub const MODERATE_FREQUENCY_SESSIONS: f64 = 3.0;
    /// Sessions per week at and above which `OPTIMAL_REST_LOW_FREQUENCY` applies
    pub const LOW_FREQUENCY_SESSIONS: f64 = 2.0;

    /// Optimal gap in days at 5+ sessions per week
    pub const OPTIMAL_REST_HIGH_FREQUENCY: f64 = 1.5;
    /// Optimal gap in days at 3-4 sessions per week
    pub const OPTIMAL_REST_MODERATE_FREQUENCY: f64 = 2.5;
    /// Optimal gap in days at 2 sessions per week
    pub const OPTIMAL_REST_LOW_FREQUENCY: f64 = 3.5;
    /// Optimal gap in days below 2 sessions per week
    pub const OPTIMAL_REST_MINIMAL_FREQUENCY: f64 = 5.0;

    /// Relative change between half-window mean gaps that counts as a trend
    pub const TREND_THRESHOLD: f64 = 0.10;

    /// Rest consistency reported when there are no gaps to measure
    pub const NEUTRAL_REST_CONSISTENCY: f64 = 50.0;

    /// Gaps shorter than this fraction of the optimal gap count as short rest
    pub const SHORT_REST_FRACTION: f64 = 0.5;

    /// Look up the optimal rest gap for a training frequency
    ///
    /// Boundaries are inclusive on the lower edge: exactly 5.0 sessions per
    /// week is high frequency, 4.999 is moderate.
    #[must_use]
    pub fn optimal_rest_days(sessions_per_week: f64) -> f64 {
        if sessions_per_week >= HIGH_FREQUENCY_SESSIONS {
            OPTIMAL_REST_HIGH_FREQUENCY
        } else if sessions_per_week >= MODERATE_FREQUENCY_SESSIONS {
            OPTIMAL_REST_MODERATE_FREQUENCY
        } else if sessions_per_week >= LOW_FREQUENCY_SESSIONS {
            OPTIMAL_REST_LOW_FREQUENCY
        } else {
            OPTIMAL_REST_MINIMAL_FREQUENCY
        }
    }
}

/// Training load model
pub mod load {
    /// Average session volume above which the intensity multiplier is raised
    pub const HIGH_VOLUME_SESSION_THRESHOLD: f64 = 5000.0;
    /// Intensity multiplier for high-volume sessions
    pub const HIGH_VOLUME_MULTIPLIER: f64 = 1.2;
    /// Intensity multiplier otherwise
    pub const BASE_INTENSITY_MULTIPLIER: f64 = 1.0;

    /// Sessions needed before the load history is trusted fully
    pub const CONSISTENT_HISTORY_SESSIONS: usize = 10;
    /// Consistency factor with a full history
    pub const FULL_CONSISTENCY_FACTOR: f64 = 1.0;
    /// Consistency factor with a short history
    pub const PARTIAL_CONSISTENCY_FACTOR: f64 = 0.8;
    /// Share of the current load considered sustainable
    pub const SUSTAINABLE_LOAD_FACTOR: f64 = 0.85;

    /// Trailing acute window in days
    pub const ACUTE_WINDOW_DAYS: i64 = 14;

    /// Load ratio below which intensity is low
    pub const LOW_INTENSITY_RATIO: f64 = 0.7;
    /// Load ratio below which intensity is moderate
    pub const MODERATE_INTENSITY_RATIO: f64 = 0.9;
    /// Load ratio below which intensity is high
    pub const HIGH_INTENSITY_RATIO: f64 = 1.1;

    /// Sessions per week that map to a frequency factor of 1.0
    pub const FREQUENCY_FACTOR_BASE_SESSIONS: f64 = 3.0;
    /// Upper bound of the frequency factor
    pub const MAX_FREQUENCY_FACTOR: f64 = 2.0;
    /// Scale applied to `load_ratio x frequency_factor`
    pub const RECOVERY_DEMAND_SCALE: f64 = 50.0;

    /// Load ratio where the ratio component of the risk score starts
    pub const RISK_RATIO_FLOOR: f64 = 0.9;
    /// Load ratio span over which the ratio component reaches 100
    pub const RISK_RATIO_SPAN: f64 = 0.6;
    /// Recovery demand where the recovery component starts
    pub const RISK_RECOVERY_FLOOR: f64 = 30.0;
    /// Recovery demand span over which the recovery component reaches 100
    pub const RISK_RECOVERY_SPAN: f64 = 70.0;
    /// Weight of the ratio component
    pub const RISK_RATIO_WEIGHT: f64 = 0.5;
    /// Weight of the recovery component
    pub const RISK_RECOVERY_WEIGHT: f64 = 0.5;

    /// Load ratio that maps to a load score of 100
    pub const LOAD_SCORE_FULL_RATIO: f64 = 1.5;

    /// Volume retention that counts a session transition as recovered
    pub const RECOVERED_VOLUME_RETENTION: f64 = 0.95;
    /// Recovery efficiency reported without transitions
    pub const NEUTRAL_RECOVERY_EFFICIENCY: f64 = 0.5;
    /// Recovery demand above which the athlete is considered fatigued
    pub const FATIGUED_RECOVERY_DEMAND: f64 = 70.0;
    /// Share of short gaps above which the athlete is considered fatigued
    pub const FATIGUED_SHORT_REST_RATIO: f64 = 0.5;
}

/// Overtraining risk buckets shared by the load model and the detector
pub mod risk {
    /// Scores below this are low risk
    pub const LOW_THRESHOLD: f64 = 30.0;
    /// Scores below this are moderate risk
    pub const MODERATE_THRESHOLD: f64 = 60.0;
    /// Scores below this are high risk; at or above is critical
    pub const HIGH_THRESHOLD: f64 = 80.0;
    /// Upper bound of every risk score
    pub const MAX_SCORE: f64 = 100.0;
}

/// Fatigue pattern detector
pub mod fatigue {
    /// Sessions needed before any pattern is evaluated
    pub const MIN_SESSIONS_FOR_PATTERNS: usize = 6;
    /// Sessions compared on each side for acute fatigue
    pub const ACUTE_BLOCK_SESSIONS: usize = 3;
    /// Sessions compared on each side for chronic fatigue
    pub const CHRONIC_BLOCK_SESSIONS: usize = 8;
    /// Minimum consecutive dropping sessions for a recovery stall
    pub const MIN_STALL_RUN: usize = 2;
    /// Gaps needed for the inconsistent recovery check
    pub const MIN_GAPS_FOR_RECOVERY_CHECK: usize = 3;

    /// Default last-3 vs previous-3 volume drop
    pub const ACUTE_VOLUME_DROP: f64 = 0.20;
    /// Default last-8 vs previous-8 volume drop
    pub const CHRONIC_VOLUME_DROP: f64 = 0.15;
    /// Default session-to-session drop for a recovery stall
    pub const RECOVERY_STALL_DROP: f64 = 0.15;
    /// Default normalized regression slope for performance decline
    pub const DECLINE_NORMALIZED_SLOPE: f64 = 0.05;
    /// Default coefficient of variation of rest gaps
    pub const INCONSISTENT_RECOVERY_CV: f64 = 0.60;

    /// Acute drop bands: moderate, high, critical; moderate starts at the default detection drop
    pub const ACUTE_SEVERITY_BANDS: [f64; 3] = [0.20, 0.35, 0.50];
    /// Chronic drop bands: moderate, high, critical
    pub const CHRONIC_SEVERITY_BANDS: [f64; 3] = [0.20, 0.30, 0.45];
    /// Normalized slope bands: moderate, high, critical
    pub const DECLINE_SEVERITY_BANDS: [f64; 3] = [0.075, 0.10, 0.15];
    /// Gap CV bands: moderate, high, critical
    pub const INCONSISTENCY_SEVERITY_BANDS: [f64; 3] = [0.75, 0.90, 1.20];
    /// Stall run lengths: moderate, high, critical
    pub const STALL_SEVERITY_RUNS: [usize; 3] = [2, 3, 4];

    /// Risk points added per pattern of each severity
    pub const CRITICAL_WEIGHT: f64 = 25.0;
    /// Risk points for a high-severity pattern
    pub const HIGH_WEIGHT: f64 = 15.0;
    /// Risk points for a moderate-severity pattern
    pub const MODERATE_WEIGHT: f64 = 8.0;
    /// Risk points for a low-severity pattern
    pub const LOW_WEIGHT: f64 = 3.0;

    /// Confidence bounds for a detected pattern
    pub const MIN_CONFIDENCE: f64 = 0.3;
    /// Upper confidence bound
    pub const MAX_CONFIDENCE: f64 = 0.95;
    /// Session count at which the sample contributes fully to confidence
    pub const FULL_CONFIDENCE_SESSIONS: f64 = 16.0;

    /// Relative distance from the recent average that flags a trend
    pub const PATTERN_TREND_THRESHOLD: f64 = 0.05;

    /// Days until reassessment at critical risk
    pub const REASSESS_CRITICAL_DAYS: u32 = 7;
    /// Days until reassessment at high risk
    pub const REASSESS_HIGH_DAYS: u32 = 5;
    /// Days until reassessment at moderate risk
    pub const REASSESS_MODERATE_DAYS: u32 = 10;
    /// Days until reassessment at low risk
    pub const REASSESS_LOW_DAYS: u32 = 14;
}

/// Periodization phase selection and cycle reconstruction
pub mod periodization {
    /// Average rest below which the rest rule applies
    pub const SHORT_REST_DAYS: f64 = 3.0;
    /// Load score above which short rest means deload
    pub const SHORT_REST_DELOAD_LOAD: f64 = 70.0;
    /// Load score below which accumulation is recommended
    pub const ACCUMULATION_MAX_LOAD: f64 = 50.0;
    /// Upper load score for intensification
    pub const INTENSIFICATION_MAX_LOAD: f64 = 80.0;
    /// Rest consistency needed for intensification
    pub const INTENSIFICATION_MIN_CONSISTENCY: f64 = 70.0;
    /// Rest consistency needed for realization
    pub const REALIZATION_MIN_CONSISTENCY: f64 = 80.0;

    /// Weekly volume tolerance around the latest week when reconstructing a block
    pub const BLOCK_VOLUME_TOLERANCE: f64 = 0.20;
    /// Weeks under this share of the window mean volume count as deload weeks
    pub const DELOAD_WEEK_VOLUME_RATIO: f64 = 0.60;

    /// Rest consistency below which transitions are riskier
    pub const TRANSITION_LOW_CONSISTENCY: f64 = 60.0;
    /// Sessions below which a transition is riskier
    pub const TRANSITION_MIN_SESSIONS: usize = 6;
    /// Transition risk points at or below which the risk is low
    pub const TRANSITION_LOW_MAX_POINTS: u32 = 1;
    /// Transition risk points at or below which the risk is medium
    pub const TRANSITION_MEDIUM_MAX_POINTS: u32 = 3;
}

/// Progression recommendation
pub mod progression {
    /// Default rounding increment for suggested weights
    pub const WEIGHT_QUANTUM: f64 = 0.25;

    /// Base increments by experience, for frequency buckets <=2, <=4 and >4 per week
    pub const BEGINNER_INCREMENTS: [f64; 3] = [0.10, 0.065, 0.04];
    /// Intermediate increments per frequency bucket
    pub const INTERMEDIATE_INCREMENTS: [f64; 3] = [0.05, 0.035, 0.025];
    /// Advanced increments per frequency bucket
    pub const ADVANCED_INCREMENTS: [f64; 3] = [0.03, 0.02, 0.015];
    /// Upper frequency of the first increment bucket
    pub const LOW_FREQUENCY_BUCKET: f64 = 2.0;
    /// Upper frequency of the second increment bucket
    pub const MODERATE_FREQUENCY_BUCKET: f64 = 4.0;
    /// Smallest base increment in the table
    pub const MIN_BASE_INCREMENT: f64 = 0.015;
    /// Largest base increment in the table
    pub const MAX_BASE_INCREMENT: f64 = 0.10;

    /// Weekly exercise volume scale for the volume multiplier
    pub const VOLUME_SCALE: f64 = 10_000.0;
    /// Multiplier reduction at `VOLUME_SCALE`
    pub const VOLUME_PENALTY: f64 = 0.3;
    /// Lower bound of the volume multiplier
    pub const MIN_VOLUME_MULTIPLIER: f64 = 0.7;
    /// Upper bound of the volume multiplier
    pub const MAX_VOLUME_MULTIPLIER: f64 = 1.0;

    /// Recovery base after a same-day repeat
    pub const RECOVERY_SAME_DAY: f64 = 0.8;
    /// Recovery base after one day
    pub const RECOVERY_ONE_DAY: f64 = 1.0;
    /// Recovery base after two days
    pub const RECOVERY_TWO_DAYS: f64 = 0.95;
    /// Recovery base after three or more days
    pub const RECOVERY_EXTENDED: f64 = 0.9;
    /// Recovery base after a long layoff at low frequency
    pub const RECOVERY_LONG_LAYOFF: f64 = 1.1;
    /// Rest days that count as a long layoff
    pub const LONG_LAYOFF_DAYS: i64 = 4;
    /// Frequency at or below which a long layoff applies
    pub const LONG_LAYOFF_MAX_FREQUENCY: f64 = 2.0;
    /// Recovery demand above which the recovery factor is reduced
    pub const HIGH_RECOVERY_DEMAND: f64 = 70.0;
    /// Recovery factor scale at very high load intensity
    pub const VERY_HIGH_INTENSITY_RECOVERY: f64 = 0.9;
    /// Recovery and plateau boost at low load intensity
    pub const LOW_INTENSITY_BOOST: f64 = 1.1;
    /// Recovery factor scale at high recovery demand
    pub const HIGH_DEMAND_RECOVERY: f64 = 0.95;
    /// Recovery factor scale at high or critical risk
    pub const ELEVATED_RISK_RECOVERY: f64 = 0.8;
    /// Recovery factor bounds
    pub const MIN_RECOVERY_FACTOR: f64 = 0.5;
    /// Upper recovery factor bound
    pub const MAX_RECOVERY_FACTOR: f64 = 1.3;

    /// Plateau adjustment at critical risk
    pub const CRITICAL_RISK_ADJUSTMENT: f64 = 0.7;
    /// Plateau adjustment at high risk
    pub const HIGH_RISK_ADJUSTMENT: f64 = 0.85;
    /// Plateau adjustment at moderate risk
    pub const MODERATE_RISK_ADJUSTMENT: f64 = 0.95;
    /// Plateau adjustment bounds
    pub const MIN_PLATEAU_ADJUSTMENT: f64 = 0.5;
    /// Upper plateau adjustment bound
    pub const MAX_PLATEAU_ADJUSTMENT: f64 = 1.2;

    /// Rep range every goal starts from
    pub const MIN_BASE_REPS: u32 = 6;
    /// Upper bound of the base rep range
    pub const MAX_BASE_REPS: u32 = 12;
    /// Rep scale and bounds for strength
    pub const STRENGTH_REP_SCALE: f64 = 0.8;
    /// Strength rep range
    pub const STRENGTH_REP_RANGE: (u32, u32) = (1, 6);
    /// Rep scale for fat loss
    pub const FAT_LOSS_REP_SCALE: f64 = 1.2;
    /// Fat loss rep range
    pub const FAT_LOSS_REP_RANGE: (u32, u32) = (12, 20);
    /// Reps suggested when the exercise has never been logged
    pub const DEFAULT_REPS: u32 = 8;

    /// Sets needed before the local plateau check runs
    pub const PLATEAU_MIN_SETS: usize = 6;
    /// Sessions compared by the local plateau check
    pub const PLATEAU_SESSIONS: usize = 4;
    /// Session pairs needed by the local plateau check
    pub const PLATEAU_MIN_PAIRS: usize = 2;
    /// Stalled pairs that flag a plateau
    pub const PLATEAU_STALLED_PAIRS: usize = 2;
    /// Best-volume improvement under which a pair counts as stalled
    pub const PLATEAU_IMPROVEMENT_THRESHOLD: f64 = 0.02;

    /// Increment share of the conservative alternative
    pub const CONSERVATIVE_SHARE: f64 = 0.7;
    /// Increment share of the aggressive alternative
    pub const AGGRESSIVE_SHARE: f64 = 1.3;
    /// Rest consistency needed for the aggressive alternative
    pub const AGGRESSIVE_MIN_CONSISTENCY: f64 = 80.0;

    /// Base confidence with a full profile and context
    pub const BASE_CONFIDENCE: f64 = 0.8;
    /// Rest consistency that earns the consistency bonus
    pub const CONFIDENCE_CONSISTENCY_THRESHOLD: f64 = 80.0;
    /// Consistency bonus
    pub const CONFIDENCE_CONSISTENCY_BONUS: f64 = 0.05;
    /// Bonus per unit of recovery efficiency
    pub const CONFIDENCE_RECOVERY_BONUS: f64 = 0.05;
    /// Penalty at high risk
    pub const CONFIDENCE_HIGH_RISK_PENALTY: f64 = 0.1;
    /// Penalty at critical risk
    pub const CONFIDENCE_CRITICAL_RISK_PENALTY: f64 = 0.2;
    /// Confidence bounds
    pub const MIN_CONFIDENCE: f64 = 0.3;
    /// Upper confidence bound
    pub const MAX_CONFIDENCE: f64 = 0.95;

    /// Increment applied when profile or context is missing
    pub const FALLBACK_INCREMENT: f64 = 0.05;
    /// Confidence reported when profile or context is missing
    pub const FALLBACK_CONFIDENCE: f64 = 0.5;
    /// Confidence reported for an exercise with no history
    pub const NO_HISTORY_CONFIDENCE: f64 = 0.3;
}

/// Plateau and long-horizon fatigue analysis
pub mod plateau {
    /// Default analysis window in weeks
    pub const WINDOW_WEEKS: u32 = 16;
    /// Data points a factor needs to report a severity
    pub const MIN_DATA_POINTS: usize = 3;
    /// Weeks of history read to measure training age on an exercise
    pub const HISTORY_WEEKS: u32 = 52;

    /// Severity bands for factor impact: moderate, high, critical
    pub const IMPACT_BANDS: [f64; 3] = [0.25, 0.50, 0.75];
    /// Impact weights: low, moderate, high, critical
    pub const IMPACT_WEIGHTS: [f64; 4] = [0.5, 1.0, 2.0, 3.0];
    /// Plateau risk bands: early warning, moderate, severe, critical
    pub const LEVEL_BANDS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

    /// Per-session normalized e1RM gain that counts as healthy progression
    pub const HEALTHY_VELOCITY: f64 = 0.01;
    /// Velocity shortfall that maps to full severity
    pub const VELOCITY_SPAN: f64 = 0.02;
    /// Weeks in each volume comparison block
    pub const VOLUME_BLOCK_WEEKS: i64 = 4;
    /// Block-over-block volume growth that counts as healthy
    pub const HEALTHY_VOLUME_GROWTH: f64 = 0.05;
    /// Volume shortfall that maps to full severity
    pub const VOLUME_SPAN: f64 = 0.15;
    /// Post-rest performance loss that maps to full severity
    pub const POST_REST_LOSS_SPAN: f64 = 0.2;
    /// Gap in days that counts as a training break for one exercise
    pub const LONG_GAP_DAYS: i64 = 14;
    /// Severity added per long gap
    pub const LONG_GAP_PENALTY: f64 = 0.2;
    /// Rep fall-off that maps to full fatigue level
    pub const FATIGUE_LEVEL_SPAN: f64 = 0.4;
    /// Per-session rise in rep fall-off that maps to full severity
    pub const FATIGUE_SLOPE_SPAN: f64 = 0.05;
    /// Trend threshold for slopes reported in factor trends
    pub const SLOPE_TREND_THRESHOLD: f64 = 0.005;

    /// Adaptation baseline, span and horizon (weeks) per experience tier
    pub const BEGINNER_ADAPTATION: (f64, f64, f64) = (0.1, 0.3, 52.0);
    /// Intermediate adaptation curve
    pub const INTERMEDIATE_ADAPTATION: (f64, f64, f64) = (0.3, 0.3, 104.0);
    /// Advanced adaptation curve
    pub const ADVANCED_ADAPTATION: (f64, f64, f64) = (0.6, 0.3, 156.0);

    /// Deload at critical plateau: weeks, volume cut %, weight cut %
    pub const CRITICAL_DELOAD: (u32, f64, f64) = (2, 70.0, 20.0);
    /// Deload at severe plateau
    pub const SEVERE_DELOAD: (u32, f64, f64) = (2, 50.0, 10.0);
    /// Deload at moderate plateau
    pub const MODERATE_DELOAD: (u32, f64, f64) = (1, 30.0, 5.0);
}

/// Empirical weekly frequency derivation
pub mod frequency {
    /// Trailing window used when the profile has no frequency
    pub const DERIVATION_WEEKS: u32 = 12;
    /// Lower bound of the derived frequency
    pub const MIN_WEEKLY_FREQUENCY: f64 = 1.0;
    /// Upper bound of the derived frequency
    pub const MAX_WEEKLY_FREQUENCY: f64 = 7.0;
}

#[cfg(test)]
mod tests {
    use super::rest_days::optimal_rest_days;

    #[test]
    fn test_rest_table_boundaries_are_exact() {
        let cases = [
            (5.0, 1.5),
            (4.999, 2.5),
            (3.0, 2.5),
            (2.999, 3.5),
            (2.0, 3.5),
            (1.999, 5.0),
        ];
        for (sessions_per_week, expected) in cases {
            let actual = optimal_rest_days(sessions_per_week);
            assert!(
                (actual - expected).abs() < f64::EPSILON,
                "{sessions_per_week} -> {actual}, expected {expected}"
            );
        }
    }
}
