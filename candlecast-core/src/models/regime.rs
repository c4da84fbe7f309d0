//! Regime-conditioned routing between two sub-models.
//!
//! A row is "bull" when its `rsi14` feature is at or above the threshold and
//! "bear" otherwise. A missing or NaN `rsi14` reads as neutral (50.0).

use tracing::warn;

use super::{check_sizes, Model, ModelError};
use crate::domain::FeatureRow;

/// Feature the router keys on.
pub const REGIME_FEATURE: &str = "rsi14";

/// Stand-in value when the regime feature is missing or NaN.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Bull,
    Bear,
}

#[derive(Debug)]
pub struct RegimeSwitch {
    bull: Option<Box<dyn Model>>,
    bear: Option<Box<dyn Model>>,
    threshold: f64,
}

impl RegimeSwitch {
    pub const DEFAULT_THRESHOLD: f64 = 50.0;

    pub fn new(bull: Box<dyn Model>, bear: Box<dyn Model>, threshold: f64) -> Self {
        Self::with_models(Some(bull), Some(bear), threshold)
    }

    /// Either side may be absent; an absent side predicts 0.0.
    pub fn with_models(
        bull: Option<Box<dyn Model>>,
        bear: Option<Box<dyn Model>>,
        threshold: f64,
    ) -> Self {
        Self {
            bull,
            bear,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bull(&self) -> Option<&dyn Model> {
        self.bull.as_deref()
    }

    pub fn bear(&self) -> Option<&dyn Model> {
        self.bear.as_deref()
    }

    pub fn regime_of(&self, row: &FeatureRow) -> Regime {
        let value = row.defined(REGIME_FEATURE).unwrap_or(NEUTRAL_RSI);
        if value >= self.threshold {
            Regime::Bull
        } else {
            Regime::Bear
        }
    }

    fn model_for(&self, regime: Regime) -> Option<&dyn Model> {
        match regime {
            Regime::Bull => self.bull(),
            Regime::Bear => self.bear(),
        }
    }
}

impl Model for RegimeSwitch {
    fn name(&self) -> &'static str {
        "regime"
    }

    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) -> Result<(), ModelError> {
        check_sizes(rows, targets)?;

        let mut bull_rows = Vec::new();
        let mut bull_targets = Vec::new();
        let mut bear_rows = Vec::new();
        let mut bear_targets = Vec::new();

        for (row, &target) in rows.iter().zip(targets) {
            match self.regime_of(row) {
                Regime::Bull => {
                    bull_rows.push(row.clone());
                    bull_targets.push(target);
                }
                Regime::Bear => {
                    bear_rows.push(row.clone());
                    bear_targets.push(target);
                }
            }
        }

        fit_side(&mut self.bull, Regime::Bull, &bull_rows, &bull_targets)?;
        fit_side(&mut self.bear, Regime::Bear, &bear_rows, &bear_targets)?;
        Ok(())
    }

    fn predict(&self, row: &FeatureRow) -> f64 {
        self.model_for(self.regime_of(row))
            .map_or(0.0, |model| model.predict(row))
    }
}

/// An empty subset leaves the sub-model exactly as constructed.
fn fit_side(
    model: &mut Option<Box<dyn Model>>,
    regime: Regime,
    rows: &[FeatureRow],
    targets: &[f64],
) -> Result<(), ModelError> {
    let Some(model) = model else {
        return Ok(());
    };
    if rows.is_empty() {
        warn!(?regime, "no training rows for regime; sub-model left unfitted");
        return Ok(());
    }
    model.fit(rows, targets)
}
