//! Regression error metrics for reporting training and holdout quality.

use serde::{Deserialize, Serialize};

/// Mean squared error. NaN when the inputs are empty.
pub fn mean_squared_error(predictions: &[f64], targets: &[f64]) -> f64 {
    mean_of(predictions, targets, |e| e * e)
}

/// Mean absolute error. NaN when the inputs are empty.
pub fn mean_absolute_error(predictions: &[f64], targets: &[f64]) -> f64 {
    mean_of(predictions, targets, f64::abs)
}

fn mean_of(predictions: &[f64], targets: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    debug_assert_eq!(predictions.len(), targets.len());
    let n = predictions.len().min(targets.len());
    if n == 0 {
        return f64::NAN;
    }
    predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| f(p - t))
        .sum::<f64>()
        / n as f64
}

/// Error summary over one evaluation set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub samples: usize,
    pub mse: f64,
    pub mae: f64,
}

impl ErrorSummary {
    pub fn compute(predictions: &[f64], targets: &[f64]) -> Self {
        Self {
            samples: predictions.len().min(targets.len()),
            mse: mean_squared_error(predictions, targets),
            mae: mean_absolute_error(predictions, targets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn known_errors() {
        let preds = [1.0, 2.0, 4.0];
        let targets = [1.0, 3.0, 2.0];
        // errors 0, -1, 2
        assert_approx(mean_squared_error(&preds, &targets), 5.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(mean_absolute_error(&preds, &targets), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_is_nan() {
        assert!(mean_squared_error(&[], &[]).is_nan());
        let summary = ErrorSummary::compute(&[], &[]);
        assert_eq!(summary.samples, 0);
        assert!(summary.mae.is_nan());
    }
}
