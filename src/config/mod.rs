// ABOUTME: Configuration management for the IronCoach engine and its command-line tools
// ABOUTME: Database location, analyzer thresholds and logging loaded from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Configuration module
//!
//! - **Environment**: database URL and engine configuration from environment variables
//! - **Intelligence**: analyzer thresholds, re-exported from `ironcoach-intelligence`

/// Environment-driven engine configuration
pub mod environment;

pub use environment::{DatabaseUrl, EngineConfig};
pub use ironcoach_intelligence::config::{ConfigError, IntelligenceConfig};
