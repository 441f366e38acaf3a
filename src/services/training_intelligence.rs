// ABOUTME: Request-scoped training intelligence pipeline over the collaborator stores
// ABOUTME: Reads one immutable log slice per call and runs context, risk, phase, progression and plateau analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! # Training Intelligence Pipeline
//!
//! ```text
//! LogStore -> TrainingContextAggregator -> OvertrainingDetector
//!          -> PeriodizationEngine -> ProgressionEngine
//!                     PlateauAnalyzer (on demand) --^
//! ```
//!
//! Each call re-reads its window from the log store. Store failures surface
//! as `StoreUnavailable`; missing profile or catalog data never fails a call.

use chrono::NaiveDate;
use ironcoach_core::errors::AppResult;
use ironcoach_core::models::{
    AnalysisWindow, AthleteId, AthleteProfile, ExerciseId, ExerciseInfo, TrainingLog,
};
use ironcoach_intelligence::config::IntelligenceConfig;
use ironcoach_intelligence::constants::{frequency, plateau};
use ironcoach_intelligence::fatigue_detection::{OvertrainingAssessment, OvertrainingDetector};
use ironcoach_intelligence::periodization::{
    PeriodizationAssessment, PeriodizationEngine, PhaseState,
};
use ironcoach_intelligence::plateau_analyzer::{PlateauAnalysis, PlateauAnalyzer, PlateauInput};
use ironcoach_intelligence::progression_engine::{
    ProgressionEngine, ProgressionInput, ProgressionRecommendation,
};
use ironcoach_intelligence::training_context::{TrainingContextAggregator, TrainingContextSummary};
use ironcoach_intelligence::training_frequency::resolve_weekly_frequency;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::store::{AthleteProfileStore, ExerciseCatalog, LogStore};

/// Everything the engine derives for one athlete on one date
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Athlete analyzed
    pub athlete_id: AthleteId,
    /// Reference date
    pub as_of: NaiveDate,
    /// Training context
    pub context: TrainingContextSummary,
    /// Overtraining risk and fatigue patterns
    pub overtraining: OvertrainingAssessment,
    /// Current phase and transition guidance
    pub periodization: PeriodizationAssessment,
    /// One recommendation per exercise trained in the context window
    pub progressions: Vec<ProgressionRecommendation>,
    /// One plateau analysis per exercise trained in the context window
    pub plateaus: Vec<PlateauAnalysis>,
}

/// Context, risk and phase computed from one log slice
struct Baseline {
    log: TrainingLog,
    context: TrainingContextSummary,
    overtraining: OvertrainingAssessment,
    periodization: PeriodizationAssessment,
}

/// Request-scoped pipeline borrowing the collaborators and configuration
pub struct IntelligencePipeline<'a> {
    logs: &'a dyn LogStore,
    catalog: &'a dyn ExerciseCatalog,
    profiles: &'a dyn AthleteProfileStore,
    config: &'a IntelligenceConfig,
}

impl<'a> IntelligencePipeline<'a> {
    /// Create a pipeline over the given collaborators
    #[must_use]
    pub fn new(
        logs: &'a dyn LogStore,
        catalog: &'a dyn ExerciseCatalog,
        profiles: &'a dyn AthleteProfileStore,
        config: &'a IntelligenceConfig,
    ) -> Self {
        Self {
            logs,
            catalog,
            profiles,
            config,
        }
    }

    fn context_window(&self, as_of: NaiveDate) -> AnalysisWindow {
        AnalysisWindow::new(as_of, self.config.context.window_weeks)
    }

    async fn read_log(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        weeks: u32,
    ) -> AppResult<TrainingLog> {
        let weeks = weeks.max(self.config.context.window_weeks);
        let range = AnalysisWindow::new(as_of, weeks).date_range();
        let log = self.logs.training_log(athlete_id, range).await?;
        debug!(
            athlete_id = %athlete_id,
            weeks,
            sessions = log.sessions.len(),
            sets = log.sets.len(),
            "Read training log slice"
        );
        Ok(log)
    }

    fn baseline(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        log: TrainingLog,
        previous_phase: Option<&PhaseState>,
    ) -> Baseline {
        let context = TrainingContextAggregator::summarize(
            athlete_id,
            self.context_window(as_of),
            &log,
            &self.config.context,
        );
        let overtraining = OvertrainingDetector::assess(&context, &self.config.fatigue);
        let periodization = PeriodizationEngine::assess(
            &context,
            Some(&overtraining),
            previous_phase,
            &self.config.periodization,
        );
        Baseline {
            log,
            context,
            overtraining,
            periodization,
        }
    }

    async fn read_baseline(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        weeks: u32,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<Baseline> {
        let log = self.read_log(athlete_id, as_of, weeks).await?;
        Ok(self.baseline(athlete_id, as_of, log, previous_phase))
    }

    /// Training context for the trailing window ending at `as_of`
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the log store read fails
    #[instrument(skip(self), fields(athlete_id = %athlete_id))]
    pub async fn training_context(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
    ) -> AppResult<TrainingContextSummary> {
        let log = self
            .read_log(athlete_id, as_of, self.config.context.window_weeks)
            .await?;
        Ok(TrainingContextAggregator::summarize(
            athlete_id,
            self.context_window(as_of),
            &log,
            &self.config.context,
        ))
    }

    /// Overtraining risk and fatigue patterns
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the log store read fails
    #[instrument(skip(self), fields(athlete_id = %athlete_id))]
    pub async fn overtraining_assessment(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
    ) -> AppResult<OvertrainingAssessment> {
        let context = self.training_context(athlete_id, as_of).await?;
        let assessment = OvertrainingDetector::assess(&context, &self.config.fatigue);
        info!(
            athlete_id = %athlete_id,
            risk_score = assessment.risk_score,
            risk_level = assessment.risk_level.as_str(),
            patterns = assessment.patterns.len(),
            "Overtraining assessment complete"
        );
        Ok(assessment)
    }

    /// Current training phase, transition guidance included
    ///
    /// `previous_phase` is the caller-persisted phase state, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the log store read fails
    #[instrument(skip(self, previous_phase), fields(athlete_id = %athlete_id))]
    pub async fn periodization(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<PeriodizationAssessment> {
        let baseline = self
            .read_baseline(
                athlete_id,
                as_of,
                self.config.context.window_weeks,
                previous_phase,
            )
            .await?;
        Ok(baseline.periodization)
    }

    /// Next weight and reps for one exercise
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the log or profile store read fails
    #[instrument(skip(self, previous_phase), fields(athlete_id = %athlete_id, exercise_id = %exercise_id))]
    pub async fn progression(
        &self,
        athlete_id: AthleteId,
        exercise_id: &ExerciseId,
        as_of: NaiveDate,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<ProgressionRecommendation> {
        let profile = self.profiles.profile(athlete_id).await?;
        let baseline = self
            .read_baseline(athlete_id, as_of, frequency::DERIVATION_WEEKS, previous_phase)
            .await?;
        let recommendation =
            self.recommend(&baseline, profile.as_ref(), exercise_id, as_of, None);
        info!(
            athlete_id = %athlete_id,
            exercise_id = %exercise_id,
            suggested_weight = recommendation.suggested_weight,
            suggested_reps = recommendation.suggested_reps,
            confidence = recommendation.confidence,
            used_defaults = recommendation.used_defaults,
            "Progression recommendation ready"
        );
        Ok(recommendation)
    }

    fn recommend(
        &self,
        baseline: &Baseline,
        profile: Option<&AthleteProfile>,
        exercise_id: &ExerciseId,
        as_of: NaiveDate,
        plateau_analysis: Option<&PlateauAnalysis>,
    ) -> ProgressionRecommendation {
        let weekly_frequency = resolve_weekly_frequency(profile, &baseline.log.sessions, as_of);
        let input = ProgressionInput {
            exercise_id,
            as_of,
            log: &baseline.log,
            profile,
            weekly_frequency: Some(weekly_frequency),
            context: Some(&baseline.context),
            assessment: Some(&baseline.overtraining),
            periodization: Some(&baseline.periodization),
            plateau: plateau_analysis,
        };
        ProgressionEngine::recommend(&input, &self.config.progression)
    }

    fn plateau_weeks(&self) -> u32 {
        plateau::HISTORY_WEEKS.max(self.config.plateau.window_weeks)
    }

    /// Long-horizon plateau analysis for one exercise
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if a collaborator read fails
    #[instrument(skip(self, previous_phase), fields(athlete_id = %athlete_id, exercise_id = %exercise_id))]
    pub async fn plateau(
        &self,
        athlete_id: AthleteId,
        exercise_id: &ExerciseId,
        as_of: NaiveDate,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<PlateauAnalysis> {
        let profile = self.profiles.profile(athlete_id).await?;
        let exercise = self.catalog.exercise(exercise_id).await?;
        let baseline = self
            .read_baseline(athlete_id, as_of, self.plateau_weeks(), previous_phase)
            .await?;
        let input = PlateauInput {
            exercise_id,
            exercise: exercise.as_ref(),
            as_of,
            log: &baseline.log,
            profile: profile.as_ref(),
            periodization: Some(&baseline.periodization),
        };
        Ok(PlateauAnalyzer::analyze(&input, &self.config.plateau))
    }

    async fn catalog_entries(&self, exercise_ids: &[ExerciseId]) -> AppResult<Vec<Option<ExerciseInfo>>> {
        let mut entries = Vec::with_capacity(exercise_ids.len());
        for exercise_id in exercise_ids {
            entries.push(self.catalog.exercise(exercise_id).await?);
        }
        Ok(entries)
    }

    fn analyze_plateaus(
        &self,
        baseline: &Baseline,
        profile: Option<&AthleteProfile>,
        exercise_ids: &[ExerciseId],
        entries: &[Option<ExerciseInfo>],
        as_of: NaiveDate,
    ) -> Vec<PlateauAnalysis> {
        let inputs: Vec<PlateauInput<'_>> = exercise_ids
            .iter()
            .zip(entries)
            .map(|(exercise_id, exercise)| PlateauInput {
                exercise_id,
                exercise: exercise.as_ref(),
                as_of,
                log: &baseline.log,
                profile,
                periodization: Some(&baseline.periodization),
            })
            .collect();
        PlateauAnalyzer::analyze_many(&inputs, &self.config.plateau)
    }

    /// Plateau analyses for every exercise trained in the plateau window
    ///
    /// Exercises are analyzed in parallel.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if a collaborator read fails
    #[instrument(skip(self, previous_phase), fields(athlete_id = %athlete_id))]
    pub async fn plateau_all(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<Vec<PlateauAnalysis>> {
        let profile = self.profiles.profile(athlete_id).await?;
        let baseline = self
            .read_baseline(athlete_id, as_of, self.plateau_weeks(), previous_phase)
            .await?;
        let plateau_range = AnalysisWindow::new(as_of, self.config.plateau.window_weeks).date_range();
        let exercise_ids = baseline.log.within(&plateau_range).exercise_ids();
        let entries = self.catalog_entries(&exercise_ids).await?;

        let analyses =
            self.analyze_plateaus(&baseline, profile.as_ref(), &exercise_ids, &entries, as_of);
        info!(
            athlete_id = %athlete_id,
            exercises = analyses.len(),
            "Plateau analysis complete for all exercises"
        );
        Ok(analyses)
    }

    /// Full report: context, risk, phase, and progression plus plateau per exercise
    ///
    /// Progression recommendations take the plateau analysis of their exercise
    /// into account.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if a collaborator read fails
    #[instrument(skip(self, previous_phase), fields(athlete_id = %athlete_id))]
    pub async fn report(
        &self,
        athlete_id: AthleteId,
        as_of: NaiveDate,
        previous_phase: Option<&PhaseState>,
    ) -> AppResult<TrainingReport> {
        let profile = self.profiles.profile(athlete_id).await?;
        let baseline = self
            .read_baseline(athlete_id, as_of, self.plateau_weeks(), previous_phase)
            .await?;
        let exercise_ids = baseline
            .log
            .within(&self.context_window(as_of).date_range())
            .exercise_ids();
        let entries = self.catalog_entries(&exercise_ids).await?;

        let plateaus =
            self.analyze_plateaus(&baseline, profile.as_ref(), &exercise_ids, &entries, as_of);
        let progressions = exercise_ids
            .iter()
            .zip(&plateaus)
            .map(|(exercise_id, analysis)| {
                self.recommend(&baseline, profile.as_ref(), exercise_id, as_of, Some(analysis))
            })
            .collect();

        info!(
            athlete_id = %athlete_id,
            exercises = exercise_ids.len(),
            risk_level = baseline.overtraining.risk_level.as_str(),
            phase = %baseline.periodization.current_phase,
            "Training report complete"
        );

        Ok(TrainingReport {
            athlete_id,
            as_of,
            context: baseline.context,
            overtraining: baseline.overtraining,
            periodization: baseline.periodization,
            progressions,
            plateaus,
        })
    }
}
