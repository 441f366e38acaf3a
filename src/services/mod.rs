// ABOUTME: Domain service layer composing the stores with the intelligence analyzers
// ABOUTME: Request-scoped pipeline reused by the CLI, tests and benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Domain service layer
//!
//! Services read through the collaborator traits and hand immutable log
//! slices to the pure analyzers. No derived output is cached or persisted.

/// Training intelligence pipeline: context, risk, phase, progression and plateau
pub mod training_intelligence;

pub use training_intelligence::{IntelligencePipeline, TrainingReport};
