// ABOUTME: Exercise catalog metadata with a neutral fallback for unknown entries
// ABOUTME: Missing names or muscle groups resolve to the id and "Full Body"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use serde::{Deserialize, Serialize};

use super::ids::ExerciseId;
use crate::constants::catalog::FALLBACK_MUSCLE_GROUP;

/// Exercise metadata from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseInfo {
    /// Catalog identifier
    pub id: ExerciseId,
    /// Display name
    pub name: String,
    /// Primary muscle group, when catalogued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
}

impl ExerciseInfo {
    /// Neutral metadata used when the catalog has no entry
    #[must_use]
    pub fn fallback(id: &ExerciseId) -> Self {
        Self {
            id: id.clone(),
            name: id.as_str().to_owned(),
            muscle_group: Some(FALLBACK_MUSCLE_GROUP.to_owned()),
        }
    }

    /// Muscle group, defaulting to "Full Body"
    #[must_use]
    pub fn muscle_group_or_default(&self) -> &str {
        self.muscle_group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or(FALLBACK_MUSCLE_GROUP)
    }

    /// Display name, defaulting to the identifier
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}
