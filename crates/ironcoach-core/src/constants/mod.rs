// ABOUTME: Constants shared across IronCoach crates, organized by domain
// ABOUTME: Catalog fallbacks and store naming used in errors and logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

/// Exercise catalog fallbacks
pub mod catalog {
    /// Muscle group reported when the catalog has no metadata
    pub const FALLBACK_MUSCLE_GROUP: &str = "Full Body";
}

/// Collaborator names used in `StoreUnavailable` errors and log fields
pub mod stores {
    /// Completed sessions and set entries
    pub const LOG_STORE: &str = "log store";
    /// Exercise metadata
    pub const EXERCISE_CATALOG: &str = "exercise catalog";
    /// Athlete profiles
    pub const ATHLETE_PROFILES: &str = "athlete profile store";
}

/// Service identity used by logging
pub mod service_names {
    /// Engine service name
    pub const IRONCOACH_ENGINE: &str = "ironcoach-engine";
}
