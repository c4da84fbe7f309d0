//! Stage-wise residual boosting over linear learners.
//!
//! Each stage is trained on whatever the previous stages left unexplained,
//! then its shrunken prediction is subtracted from the residual. Fitting the
//! residual directly is the squared-error special case of gradient boosting;
//! it is not valid for other losses.

use tracing::debug;

use super::{check_sizes, LinearModel, Model, ModelError};
use crate::domain::FeatureRow;

#[derive(Debug, Clone)]
pub struct OnlineBoost {
    learners: Vec<LinearModel>,
    shrinkage: f64,
}

impl OnlineBoost {
    pub const DEFAULT_LEARNERS: usize = 3;
    pub const DEFAULT_SHRINKAGE: f64 = 0.1;

    /// `n_learners` default linear learners sharing one learning rate.
    pub fn new(n_learners: usize, learning_rate: f64, shrinkage: f64) -> Self {
        let learners = (0..n_learners)
            .map(|_| LinearModel::new(learning_rate))
            .collect();
        Self::from_learners(learners, shrinkage)
    }

    /// Boost over explicitly configured stages, e.g. one learning rate each.
    pub fn from_learners(learners: Vec<LinearModel>, shrinkage: f64) -> Self {
        Self {
            learners,
            shrinkage,
        }
    }

    pub fn learners(&self) -> &[LinearModel] {
        &self.learners
    }

    pub fn shrinkage(&self) -> f64 {
        self.shrinkage
    }
}

impl Default for OnlineBoost {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_LEARNERS,
            LinearModel::DEFAULT_LEARNING_RATE,
            Self::DEFAULT_SHRINKAGE,
        )
    }
}

impl Model for OnlineBoost {
    fn name(&self) -> &'static str {
        "boost"
    }

    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError> {
        check_sizes(rows, targets)?;

        let mut residual = targets.to_vec();
        for (stage, learner) in self.learners.iter_mut().enumerate() {
            learner.fit(rows, &residual)?;
            for (r, row) in residual.iter_mut().zip(rows) {
                *r -= self.shrinkage * learner.predict(row);
            }
            debug!(stage, examples = rows.len(), "boost stage fitted");
        }
        Ok(())
    }

    fn predict(&self, row: &FeatureRow) -> f64 {
        self.learners
            .iter()
            .map(|learner| self.shrinkage * learner.predict(row))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    fn dataset() -> (Vec<FeatureRow>, Vec<f64>) {
        let rows: Vec<FeatureRow> = (0..8)
            .map(|i| {
                let x = i as f64 * 0.5;
                FeatureRow::from_pairs([("x", x), ("x2", x * x)])
            })
            .collect();
        let targets = rows
            .iter()
            .map(|r| 1.0 + 0.5 * r.get("x").unwrap() - 0.2 * r.get("x2").unwrap())
            .collect();
        (rows, targets)
    }

    #[test]
    fn predict_is_shrunken_sum_of_learners() {
        let (rows, targets) = dataset();
        let mut boost = OnlineBoost::new(3, 0.01, 0.3);
        boost.fit(&rows, &targets).unwrap();

        for row in &rows {
            let sum: f64 = boost.learners().iter().map(|l| l.predict(row)).sum();
            assert_approx(boost.predict(row), boost.shrinkage() * sum, 1e-12);
        }
    }

    #[test]
    fn stages_fit_residuals() {
        let (rows, targets) = dataset();
        let shrinkage = 0.5;
        let mut boost = OnlineBoost::from_learners(
            vec![LinearModel::new(0.02), LinearModel::new(0.005)],
            shrinkage,
        );
        boost.fit(&rows, &targets).unwrap();

        // Replay by hand.
        let mut first = LinearModel::new(0.02);
        first.fit(&rows, &targets).unwrap();
        let residual: Vec<f64> = rows
            .iter()
            .zip(&targets)
            .map(|(row, t)| t - shrinkage * first.predict(row))
            .collect();
        let mut second = LinearModel::new(0.005);
        second.fit(&rows, &residual).unwrap();

        assert_eq!(boost.learners()[0].weights(), first.weights());
        assert_eq!(boost.learners()[1].weights(), second.weights());
        assert_eq!(boost.learners()[1].bias(), second.bias());
    }

    #[test]
    fn single_full_stage_matches_linear_model() {
        let (rows, targets) = dataset();
        let mut boost = OnlineBoost::new(1, 0.01, 1.0);
        let mut linear = LinearModel::new(0.01);
        boost.fit(&rows, &targets).unwrap();
        linear.fit(&rows, &targets).unwrap();
        for row in &rows {
            assert_eq!(boost.predict(row), linear.predict(row));
        }
    }

    #[test]
    fn size_mismatch_leaves_learners_untouched() {
        let (rows, _) = dataset();
        let mut boost = OnlineBoost::default();
        assert!(boost.fit(&rows, &[1.0, 2.0]).is_err());
        assert!(boost.learners().iter().all(|l| l.vocabulary().is_empty()));
    }

    #[test]
    fn defaults() {
        let boost = OnlineBoost::default();
        assert_eq!(boost.learners().len(), 3);
        assert_eq!(boost.shrinkage(), 0.1);
        assert_eq!(boost.name(), "boost");
    }

    #[test]
    fn empty_ensemble_predicts_zero() {
        let mut boost = OnlineBoost::from_learners(Vec::new(), 0.1);
        let (rows, targets) = dataset();
        boost.fit(&rows, &targets).unwrap();
        assert_eq!(boost.predict(&rows[0]), 0.0);
    }
}
