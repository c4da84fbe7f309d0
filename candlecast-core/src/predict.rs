//! Train-then-predict over a raw candle series.
//!
//! Features at bar `i - 1` are paired with the close at bar `i`, a model is
//! fitted on every pair, and the features of the final bar give the
//! next-close prediction. With fewer than two training pairs nothing is
//! fitted and the last close is returned.

use chrono::DateTime;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Bar, FeatureRow};
use crate::features::make_features;
use crate::models::{LinearModel, Model, ModelError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("need at least 2 candles, got {0}")]
    NotEnoughCandles(usize),

    #[error("candle row has {0} values, expected at least 6")]
    MalformedRow(usize),

    #[error("candle timestamp {0} is not a representable epoch second")]
    InvalidTimestamp(f64),

    #[error("model produced a non-finite prediction: {0}")]
    InvalidPrediction(f64),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One OHLCV observation with an epoch-seconds timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Training pairs below which the boundary skips fitting.
const MIN_TRAINING_PAIRS: usize = 2;

impl Candle {
    fn to_bar(self) -> Result<Bar, PredictError> {
        let timestamp = DateTime::from_timestamp(self.timestamp, 0)
            .ok_or(PredictError::InvalidTimestamp(self.timestamp as f64))?;
        Ok(Bar {
            timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            symbol: String::new(),
        })
    }
}

impl From<&Bar> for Candle {
    fn from(bar: &Bar) -> Self {
        Self {
            timestamp: bar.timestamp.timestamp(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// `[timestamp, open, high, low, close, volume, ..]`; extra values are ignored.
/// Fractional seconds are truncated.
impl TryFrom<&[f64]> for Candle {
    type Error = PredictError;

    fn try_from(row: &[f64]) -> Result<Self, Self::Error> {
        match *row {
            [timestamp, open, high, low, close, volume, ..] => Ok(Self {
                timestamp: epoch_seconds(timestamp)?,
                open,
                high,
                low,
                close,
                volume,
            }),
            _ => Err(PredictError::MalformedRow(row.len())),
        }
    }
}

fn epoch_seconds(raw: f64) -> Result<i64, PredictError> {
    let secs = raw.trunc();
    if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 {
        let secs = secs as i64;
        if DateTime::from_timestamp(secs, 0).is_some() {
            return Ok(secs);
        }
    }
    Err(PredictError::InvalidTimestamp(raw))
}

/// Sanitized (feature[i-1], close[i]) pairs for one symbol's bars.
pub fn next_close_pairs(bars: &[Bar]) -> (Vec<FeatureRow>, Vec<f64>) {
    let mut rows = sanitized_features(bars);
    rows.pop();
    let targets = bars.iter().skip(1).map(|b| b.close).collect();
    (rows, targets)
}

fn sanitized_features(bars: &[Bar]) -> Vec<FeatureRow> {
    let mut rows = make_features(bars);
    for row in &mut rows {
        row.sanitize();
    }
    rows
}

/// Fit a fresh default `LinearModel` and predict the next close.
pub fn predict_from_candles(candles: &[Candle]) -> Result<f64, PredictError> {
    let mut model = LinearModel::default();
    predict_with(&mut model, candles)
}

/// Same pipeline as [`predict_from_candles`] with a caller-supplied model.
/// The model is refitted from scratch.
pub fn predict_with(model: &mut dyn Model, candles: &[Candle]) -> Result<f64, PredictError> {
    if candles.len() < 2 {
        return Err(PredictError::NotEnoughCandles(candles.len()));
    }

    let bars = candles
        .iter()
        .map(|c| c.to_bar())
        .collect::<Result<Vec<Bar>, _>>()?;
    let mut rows = sanitized_features(&bars);
    let last = rows
        .pop()
        .ok_or(PredictError::NotEnoughCandles(candles.len()))?;

    let prediction = if rows.len() < MIN_TRAINING_PAIRS {
        debug!(pairs = rows.len(), "too few training pairs, returning last close");
        candles[candles.len() - 1].close
    } else {
        let targets: Vec<f64> = bars.iter().skip(1).map(|b| b.close).collect();
        model.fit(&rows, &targets)?;
        model.predict(&last)
    };
    if !prediction.is_finite() {
        return Err(PredictError::InvalidPrediction(prediction));
    }
    Ok(prediction)
}
