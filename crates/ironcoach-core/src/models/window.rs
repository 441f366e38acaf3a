// ABOUTME: Trailing analysis windows and inclusive date ranges over the training log
// ABOUTME: Every analysis receives its reference date explicitly instead of reading a clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included
    pub start: NaiveDate,
    /// Last day included
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting inverted bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::invalid_input(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `date` falls inside the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Trailing window of whole weeks ending on `as_of`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    /// Reference date (last day included)
    pub as_of: NaiveDate,
    /// Window length in weeks
    pub weeks: u32,
}

impl AnalysisWindow {
    /// Create a window; zero-week windows are widened to one week
    #[must_use]
    pub fn new(as_of: NaiveDate, weeks: u32) -> Self {
        Self {
            as_of,
            weeks: weeks.max(1),
        }
    }

    /// Window length in days
    #[must_use]
    pub fn days(&self) -> i64 {
        i64::from(self.weeks) * 7
    }

    /// First day included in the window
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.as_of - Duration::days(self.days() - 1)
    }

    /// The window as an inclusive date range
    #[must_use]
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start(),
            end: self.as_of,
        }
    }

    /// Whether `date` falls inside the window
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_range().contains(date)
    }

    /// A shorter trailing window with the same reference date
    #[must_use]
    pub fn trailing_days(&self, days: i64) -> DateRange {
        let days = days.clamp(1, self.days());
        DateRange {
            start: self.as_of - Duration::days(days - 1),
            end: self.as_of,
        }
    }
}
