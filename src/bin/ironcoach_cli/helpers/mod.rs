// ABOUTME: Helper modules for ironcoach-cli
// ABOUTME: JSON output formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

pub mod output;
