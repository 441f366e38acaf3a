// ABOUTME: Core types and constants for the IronCoach training intelligence engine
// ABOUTME: Foundation crate with error handling, identifiers and training log models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![deny(unsafe_code)]

//! # IronCoach Core
//!
//! Foundation crate providing shared types for the IronCoach training
//! intelligence engine. It changes rarely so the analytics and adapter crates
//! keep their incremental compilation benefits.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the `AppResult` alias
//! - **models**: sessions, set logs, athlete profile, exercise metadata, windows
//! - **constants**: catalog fallbacks and collaborator names

/// Unified error handling with standard error codes
pub mod errors;

/// Constants organized by domain
pub mod constants;

/// Training log, athlete and exercise models
pub mod models;
