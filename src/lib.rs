// ABOUTME: Main library entry point for the IronCoach training intelligence engine
// ABOUTME: Wires the collaborator stores to the analyzers and exposes configuration and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![deny(unsafe_code)]

//! # `IronCoach`
//!
//! Training intelligence for strength training logs. Given an athlete's
//! completed sessions and set entries, the engine derives a training context,
//! scores overtraining risk, tracks the periodization phase, suggests the next
//! working weight and reps per exercise, and analyzes long-horizon plateaus.
//!
//! ## Architecture
//!
//! - **`ironcoach-core`**: identifiers, training log models, errors
//! - **`ironcoach-intelligence`**: the pure analyzers and their configuration
//! - **Store**: read-only collaborator traits with in-memory and `SQLite` adapters
//! - **Services**: the request-scoped [`IntelligencePipeline`]
//! - **Config** and **Logging**: environment configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use ironcoach::config::IntelligenceConfig;
//! use ironcoach::errors::AppResult;
//! use ironcoach::models::AthleteId;
//! use ironcoach::services::IntelligencePipeline;
//! use ironcoach::store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = SqliteStore::connect("sqlite:./data/ironcoach.db").await?;
//!     let config = IntelligenceConfig::default();
//!     let pipeline = IntelligencePipeline::new(&store, &store, &store, &config);
//!
//!     let athlete = AthleteId::parse("7d6f0c1e-4f7b-4a8e-9a55-2f1e1c3b8d10")?;
//!     let as_of = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default();
//!     let assessment = pipeline.overtraining_assessment(athlete, as_of).await?;
//!     println!("risk level: {}", assessment.risk_level.as_str());
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;
/// Structured logging setup
pub mod logging;
/// Request-scoped pipeline services
pub mod services;
/// Read-only collaborator stores
pub mod store;

/// Error types shared across the workspace
pub use ironcoach_core::errors;
/// Domain models shared across the workspace
pub use ironcoach_core::models;
/// Intelligence analyzers
pub use ironcoach_intelligence as intelligence;

pub use services::{IntelligencePipeline, TrainingReport};
pub use store::{AthleteProfileStore, ExerciseCatalog, InMemoryStore, LogStore, SqliteStore};
