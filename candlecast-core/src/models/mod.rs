//! Model contract and the three learners that implement it.
//!
//! - `LinearModel`: online SGD regressor/classifier, the only learner that
//!   owns weights.
//! - `OnlineBoost`: stage-wise residual boosting over `LinearModel`s.
//! - `RegimeSwitch`: routes rows to a bull or bear sub-model by RSI.
//!
//! Models own their state exclusively. `fit` takes `&mut self`, so a model
//! cannot be trained while it is being read.

pub mod boost;
pub mod linear;
pub mod regime;

pub use boost::OnlineBoost;
pub use linear::LinearModel;
pub use regime::{Regime, RegimeSwitch, NEUTRAL_RSI, REGIME_FEATURE};

use crate::domain::FeatureRow;
use std::fmt;
use thiserror::Error;

/// Errors raised while training a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("size mismatch: {rows} feature rows but {targets} targets")]
    SizeMismatch { rows: usize, targets: usize },
}

/// Capability set every learner satisfies.
pub trait Model: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Train on a labeled set, replacing any previous state.
    ///
    /// Fails with `ModelError::SizeMismatch` when `rows.len() != targets.len()`.
    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError>;

    /// Predict a scalar for one row. Pure with respect to model state.
    fn predict(&self, row: &FeatureRow) -> f64;

    /// Order-preserving map of `predict` over `rows`.
    fn predict_batch(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

pub(crate) fn check_sizes(rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError> {
    if rows.len() != targets.len() {
        return Err(ModelError::SizeMismatch {
            rows: rows.len(),
            targets: targets.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ConstantModel(f64);

    impl Model for ConstantModel {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError> {
            check_sizes(rows, targets)
        }

        fn predict(&self, _row: &FeatureRow) -> f64 {
            self.0
        }
    }

    #[test]
    fn predict_batch_preserves_order_and_length() {
        let mut model = LinearModel::default();
        let rows = vec![
            FeatureRow::from_pairs([("a", 1.0)]),
            FeatureRow::from_pairs([("a", 2.0)]),
            FeatureRow::from_pairs([("a", 3.0)]),
        ];
        model.fit(&rows, &[1.0, 2.0, 3.0]).unwrap();

        let batch = model.predict_batch(&rows);
        assert_eq!(batch.len(), 3);
        for (row, pred) in rows.iter().zip(&batch) {
            assert_eq!(model.predict(row), *pred);
        }
    }

    #[test]
    fn default_batch_uses_single_predict() {
        let model = ConstantModel(7.0);
        let rows = vec![FeatureRow::default(); 4];
        assert_eq!(model.predict_batch(&rows), vec![7.0; 4]);
        assert!(model.predict_batch(&[]).is_empty());
    }

    #[test]
    fn size_mismatch_reports_counts() {
        let err = check_sizes(&[FeatureRow::default()], &[]).unwrap_err();
        assert_eq!(err, ModelError::SizeMismatch { rows: 1, targets: 0 });
        assert_eq!(
            err.to_string(),
            "size mismatch: 1 feature rows but 0 targets"
        );
    }
}
