// ABOUTME: Command modules for ironcoach-cli
// ABOUTME: Analysis commands over the pipeline and the training log import
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

pub mod analysis;
pub mod import;
