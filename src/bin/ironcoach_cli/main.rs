// ABOUTME: IronCoach CLI - runs the training intelligence pipeline against a SQLite training log
// ABOUTME: Prints context, risk, phase, progression, plateau and report results as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors
//!
//! Usage:
//! ```bash
//! # Create the schema and load a JSON training log export
//! ironcoach-cli import --file ./data/log.json
//!
//! # Training context and overtraining risk
//! ironcoach-cli context --athlete 7d6f0c1e-4f7b-4a8e-9a55-2f1e1c3b8d10
//! ironcoach-cli risk --athlete 7d6f0c1e-4f7b-4a8e-9a55-2f1e1c3b8d10 --as-of 2025-06-30
//!
//! # Current phase, continuing from a persisted phase state
//! ironcoach-cli phase --athlete <id> --phase accumulation --phase-started 2025-06-02
//!
//! # Next session for one exercise, plateau analysis for one or all exercises
//! ironcoach-cli progress --athlete <id> --exercise back_squat
//! ironcoach-cli plateau --athlete <id> [--exercise back_squat]
//!
//! # Everything at once
//! ironcoach-cli report --athlete <id>
//! ```

mod commands;
mod helpers;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use ironcoach::{
    config::{DatabaseUrl, EngineConfig},
    errors::{AppError, AppResult},
    intelligence::periodization::{PhaseState, TrainingPhase},
    models::{AthleteId, ExerciseId},
    services::IntelligencePipeline,
    store::SqliteStore,
};
use std::path::PathBuf;
use tracing::{debug, info};

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "ironcoach-cli",
    about = "IronCoach training intelligence CLI",
    long_about = "Runs the IronCoach training intelligence engine against a SQLite training log and prints JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Reference date (YYYY-MM-DD), defaults to today in UTC
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

/// Persisted phase state passed in by the caller
#[derive(Args)]
struct PhaseArgs {
    /// Phase the athlete is currently in
    #[arg(long, requires = "phase_started")]
    phase: Option<TrainingPhase>,

    /// First day of the current phase (YYYY-MM-DD)
    #[arg(long, requires = "phase")]
    phase_started: Option<NaiveDate>,
}

impl PhaseArgs {
    fn state(&self) -> Option<PhaseState> {
        self.phase
            .zip(self.phase_started)
            .map(|(phase, started_on)| PhaseState { phase, started_on })
    }
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create the schema and import a JSON training log export
    Import {
        /// JSON file with sessions, sets, exercises and profiles
        #[arg(long)]
        file: PathBuf,
    },

    /// Training context for the trailing window
    Context {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,
    },

    /// Overtraining risk and fatigue patterns
    Risk {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,
    },

    /// Current periodization phase and transition guidance
    Phase {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,

        #[command(flatten)]
        previous: PhaseArgs,
    },

    /// Next weight and reps for one exercise
    Progress {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,

        /// Exercise id
        #[arg(long)]
        exercise: ExerciseId,

        #[command(flatten)]
        previous: PhaseArgs,
    },

    /// Plateau analysis for one exercise, or every exercise when omitted
    Plateau {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,

        /// Exercise id
        #[arg(long)]
        exercise: Option<ExerciseId>,

        #[command(flatten)]
        previous: PhaseArgs,
    },

    /// Full training report
    Report {
        /// Athlete id (UUID)
        #[arg(long)]
        athlete: AthleteId,

        #[command(flatten)]
        previous: PhaseArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if cli.verbose {
        config.logging = config.logging.with_level("debug");
    }
    config
        .logging
        .init()
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))?;
    info!("IronCoach CLI");

    if let Some(url) = cli.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(url)?;
    }
    config.log_summary();

    let store = SqliteStore::connect(&config.database_url.to_connection_string()).await?;
    store.ensure_schema().await?;

    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());
    debug!(%as_of, "Reference date");
    let pipeline = IntelligencePipeline::new(&store, &store, &store, &config.intelligence);

    match cli.command {
        Command::Import { file } => commands::import::run(&store, &file).await?,
        Command::Context { athlete } => commands::analysis::context(&pipeline, athlete, as_of).await?,
        Command::Risk { athlete } => commands::analysis::risk(&pipeline, athlete, as_of).await?,
        Command::Phase { athlete, previous } => {
            commands::analysis::phase(&pipeline, athlete, as_of, previous.state()).await?;
        }
        Command::Progress {
            athlete,
            exercise,
            previous,
        } => {
            commands::analysis::progress(&pipeline, athlete, &exercise, as_of, previous.state())
                .await?;
        }
        Command::Plateau {
            athlete,
            exercise,
            previous,
        } => {
            commands::analysis::plateau(
                &pipeline,
                athlete,
                exercise.as_ref(),
                as_of,
                previous.state(),
            )
            .await?;
        }
        Command::Report { athlete, previous } => {
            commands::analysis::report(&pipeline, athlete, as_of, previous.state()).await?;
        }
    }

    Ok(())
}
