// ABOUTME: Common benchmark utilities and fixtures for the intelligence benchmarks
// ABOUTME: Provides deterministic training log generators for Criterion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Common benchmark utilities and fixtures.

pub mod fixtures;
