//! Online linear / logistic regression.
//!
//! Per-example stochastic gradient descent over named features with an L2
//! penalty and an epoch-wise learning-rate decay:
//!
//! ```text
//! lr_e   = lr_0 / (1 + decay * e)
//! pred   = bias + sum(w_f * x_f)            (sigmoid of that when logistic)
//! error  = pred - target
//! bias  -= lr_e * error
//! w_f   -= lr_e * (error * x_f + lambda * w_f)   for each present feature f
//! ```
//!
//! Absent and NaN features are skipped entirely: they contribute nothing to
//! the dot product and their weights get no update, not even the L2 term.

use std::collections::HashMap;

use tracing::debug;

use super::{check_sizes, Model, ModelError};
use crate::domain::FeatureRow;

#[derive(Debug, Clone)]
pub struct LinearModel {
    learning_rate: f64,
    epochs: usize,
    lambda: f64,
    decay: f64,
    logistic: bool,

    feature_names: Vec<String>,
    feature_index: HashMap<String, usize>,
    /// weights[0] is the bias; weights[i + 1] belongs to feature_names[i].
    weights: Vec<f64>,
    epoch_losses: Vec<f64>,
}

impl LinearModel {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
    pub const DEFAULT_EPOCHS: usize = 100;

    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            epochs: Self::DEFAULT_EPOCHS,
            lambda: 0.0,
            decay: 0.0,
            logistic: false,
            feature_names: Vec::new(),
            feature_index: HashMap::new(),
            weights: Vec::new(),
            epoch_losses: Vec::new(),
        }
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// L2 regularization strength.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Learning-rate decay per epoch.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Squash predictions through a sigmoid (log-loss gradient).
    pub fn with_logistic(mut self, logistic: bool) -> Self {
        self.logistic = logistic;
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn is_logistic(&self) -> bool {
        self.logistic
    }

    /// Feature names in weight order, as built by the last `fit`.
    pub fn vocabulary(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature weights (bias excluded), aligned with `vocabulary()`.
    pub fn weights(&self) -> &[f64] {
        self.weights.get(1..).unwrap_or(&[])
    }

    pub fn bias(&self) -> f64 {
        self.weights.first().copied().unwrap_or(0.0)
    }

    /// Weight for a named feature, if it is in the vocabulary.
    pub fn weight(&self, name: &str) -> Option<f64> {
        self.feature_index
            .get(name)
            .map(|&idx| self.weights[idx + 1])
    }

    /// Mean squared error of each epoch, measured on the pre-update
    /// prediction of every example during the pass.
    pub fn epoch_losses(&self) -> &[f64] {
        &self.epoch_losses
    }

    /// Union of names across all rows in first-seen order. Rows iterate
    /// alphabetically, so the result is deterministic for a given input.
    fn build_vocabulary(&mut self, rows: &[FeatureRow]) {
        self.feature_names.clear();
        self.feature_index.clear();
        for row in rows {
            for name in row.values.keys() {
                if !self.feature_index.contains_key(name) {
                    self.feature_index
                        .insert(name.clone(), self.feature_names.len());
                    self.feature_names.push(name.clone());
                }
            }
        }
    }

    fn linear(&self, row: &FeatureRow) -> f64 {
        let mut sum = self.bias();
        for (name, value) in row.iter_defined() {
            if let Some(&idx) = self.feature_index.get(name) {
                sum += self.weights[idx + 1] * value;
            }
        }
        sum
    }

    fn activate(&self, linear: f64) -> f64 {
        if self.logistic {
            sigmoid(linear)
        } else {
            linear
        }
    }
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

impl Model for LinearModel {
    fn name(&self) -> &'static str {
        if self.logistic {
            "logistic"
        } else {
            "linear"
        }
    }

    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError> {
        check_sizes(rows, targets)?;

        self.build_vocabulary(rows);
        self.weights = vec![0.0; self.feature_names.len() + 1];
        self.epoch_losses.clear();

        for epoch in 0..self.epochs {
            let lr = self.learning_rate / (1.0 + self.decay * epoch as f64);
            let mut squared_error = 0.0;

            for (row, &target) in rows.iter().zip(targets) {
                let pred = self.activate(self.linear(row));
                let error = pred - target;
                squared_error += error * error;

                self.weights[0] -= lr * error;
                for (name, value) in row.iter_defined() {
                    if let Some(&idx) = self.feature_index.get(name) {
                        let w = &mut self.weights[idx + 1];
                        *w -= lr * (error * value + self.lambda * *w);
                    }
                }
            }

            let loss = if rows.is_empty() {
                0.0
            } else {
                squared_error / rows.len() as f64
            };
            self.epoch_losses.push(loss);
        }

        debug!(
            model = self.name(),
            examples = rows.len(),
            features = self.feature_names.len(),
            epochs = self.epochs,
            final_loss = self.epoch_losses.last().copied().unwrap_or(f64::NAN),
            "fitted linear model"
        );
        Ok(())
    }

    fn predict(&self, row: &FeatureRow) -> f64 {
        self.activate(self.linear(row))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
