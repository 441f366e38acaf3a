// ABOUTME: Statistical helpers for volume and strength trend calculations
// ABOUTME: Least-squares regression, dispersion measures and weight quantization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

use serde::{Deserialize, Serialize};

use crate::constants::progression;

/// Linear regression results over an evenly spaced series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Slope of the regression line (change per sample)
    pub slope: f64,
    /// Y-intercept of the regression line
    pub intercept: f64,
    /// Coefficient of determination (0-1)
    pub r_squared: f64,
    /// Pearson correlation coefficient (-1 to 1)
    pub correlation: f64,
    /// Standard error of the estimate
    pub standard_error: f64,
    /// Number of samples
    pub samples: usize,
}

impl RegressionResult {
    /// Slope relative to the series mean, `None` when the mean is zero
    #[must_use]
    pub fn normalized_slope(&self, mean: f64) -> Option<f64> {
        if mean.abs() < f64::EPSILON {
            None
        } else {
            Some(self.slope / mean)
        }
    }
}

/// Statistical analyzer for training series
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Least-squares regression of `values` against their index
    ///
    /// Returns `None` with fewer than two samples or non-finite input.
    #[must_use]
    pub fn linear_regression(values: &[f64]) -> Option<RegressionResult> {
        if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let n = values.len() as f64;
        let x_values: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();

        let sum_x = x_values.iter().sum::<f64>();
        let sum_y = values.iter().sum::<f64>();
        let sum_xx = x_values.iter().map(|x| x * x).sum::<f64>();
        let sum_x_y = x_values
            .iter()
            .zip(values)
            .map(|(x, y)| x * y)
            .sum::<f64>();
        let sum_yy = values.iter().map(|y| y * y).sum::<f64>();

        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let denominator = (n * mean_x).mul_add(-mean_x, sum_xx);
        if denominator.abs() < f64::EPSILON {
            return None;
        }

        let numerator = (n * mean_x).mul_add(-mean_y, sum_x_y);
        let slope = numerator / denominator;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let variance_y = (n * mean_y).mul_add(-mean_y, sum_yy);
        let correlation = if variance_y <= f64::EPSILON {
            0.0
        } else {
            (numerator / (denominator * variance_y).sqrt()).clamp(-1.0, 1.0)
        };

        let sse = x_values
            .iter()
            .zip(values)
            .map(|(x, actual)| {
                let diff = actual - slope.mul_add(*x, intercept);
                diff * diff
            })
            .sum::<f64>();
        let degrees_of_freedom = values.len().saturating_sub(2);
        let standard_error = if degrees_of_freedom > 0 {
            (sse / degrees_of_freedom as f64).sqrt()
        } else {
            0.0
        };

        Some(RegressionResult {
            slope,
            intercept,
            r_squared: correlation * correlation,
            correlation,
            standard_error,
            samples: values.len(),
        })
    }

    /// Arithmetic mean, zero for an empty slice
    #[must_use]
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Population standard deviation
    #[must_use]
    pub fn standard_deviation(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let mean = Self::mean(values);
        let variance = values
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / values.len() as f64;
        variance.sqrt()
    }

    /// Coefficient of variation (std / mean), `None` when the mean is zero
    #[must_use]
    pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
        let mean = Self::mean(values);
        if mean.abs() < f64::EPSILON {
            return None;
        }
        Some(Self::standard_deviation(values) / mean)
    }

    /// Regression slope divided by the series mean
    #[must_use]
    pub fn normalized_slope(values: &[f64]) -> Option<f64> {
        Self::linear_regression(values)?.normalized_slope(Self::mean(values))
    }

    /// Relative change from `previous` to `current`, `None` when `previous` is zero
    #[must_use]
    pub fn relative_change(previous: f64, current: f64) -> Option<f64> {
        if previous.abs() < f64::EPSILON {
            None
        } else {
            Some((current - previous) / previous)
        }
    }
}

/// Round `value` to the nearest non-negative multiple of `quantum`
///
/// Negative or non-finite values quantize to zero. A non-positive or non-finite
/// quantum is replaced by the default weight quantum.
#[must_use]
pub fn quantize(value: f64, quantum: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let quantum = if quantum.is_finite() && quantum > 0.0 {
        quantum
    } else {
        progression::WEIGHT_QUANTUM
    };
    (value / quantum).round() * quantum
}

/// Clamp to `[0, 100]`, mapping NaN to zero
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
