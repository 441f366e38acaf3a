// ABOUTME: Analysis commands for ironcoach-cli
// ABOUTME: Context, risk, phase, progress, plateau and report over the intelligence pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use chrono::NaiveDate;
use ironcoach::{
    errors::AppResult,
    intelligence::periodization::PhaseState,
    models::{AthleteId, ExerciseId},
    services::IntelligencePipeline,
};
use tracing::info;

use crate::helpers::output::print_json;

type Result<T> = AppResult<T>;

/// Print the training context
pub async fn context(pipeline: &IntelligencePipeline<'_>, athlete: AthleteId, as_of: NaiveDate) -> Result<()> {
    let summary = pipeline.training_context(athlete, as_of).await?;
    if summary.insufficient_data {
        info!("Fewer than two sessions in the window; metrics are neutral");
    }
    print_json(&summary)
}

/// Print the overtraining assessment
pub async fn risk(pipeline: &IntelligencePipeline<'_>, athlete: AthleteId, as_of: NaiveDate) -> Result<()> {
    print_json(&pipeline.overtraining_assessment(athlete, as_of).await?)
}

/// Print the periodization assessment
pub async fn phase(
    pipeline: &IntelligencePipeline<'_>,
    athlete: AthleteId,
    as_of: NaiveDate,
    previous: Option<PhaseState>,
) -> Result<()> {
    let assessment = pipeline
        .periodization(athlete, as_of, previous.as_ref())
        .await?;
    if assessment.transition_due {
        info!(
            "Transition from {} to {} is due",
            assessment.current_phase, assessment.next_phase
        );
    }
    print_json(&assessment)
}

/// Print the progression recommendation for one exercise
pub async fn progress(
    pipeline: &IntelligencePipeline<'_>,
    athlete: AthleteId,
    exercise: &ExerciseId,
    as_of: NaiveDate,
    previous: Option<PhaseState>,
) -> Result<()> {
    print_json(
        &pipeline
            .progression(athlete, exercise, as_of, previous.as_ref())
            .await?,
    )
}

/// Print plateau analysis for one exercise, or for all of them
pub async fn plateau(
    pipeline: &IntelligencePipeline<'_>,
    athlete: AthleteId,
    exercise: Option<&ExerciseId>,
    as_of: NaiveDate,
    previous: Option<PhaseState>,
) -> Result<()> {
    match exercise {
        Some(exercise) => print_json(
            &pipeline
                .plateau(athlete, exercise, as_of, previous.as_ref())
                .await?,
        ),
        None => print_json(
            &pipeline
                .plateau_all(athlete, as_of, previous.as_ref())
                .await?,
        ),
    }
}

/// Print the full training report
pub async fn report(
    pipeline: &IntelligencePipeline<'_>,
    athlete: AthleteId,
    as_of: NaiveDate,
    previous: Option<PhaseState>,
) -> Result<()> {
    print_json(&pipeline.report(athlete, as_of, previous.as_ref()).await?)
}
