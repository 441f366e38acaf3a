// ABOUTME: Shared test helpers and fixtures for integration tests
// ABOUTME: Exports the training log builder and common athlete fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod training_log;
