//! Feature assembly: one `FeatureRow` per bar at fixed indicator settings.
//!
//! The key names are a contract. `RegimeSwitch` routes on `"rsi14"`, and the
//! CLI writes `FEATURE_NAMES` as its CSV header.

use crate::domain::{closes, Bar, FeatureRow};
use crate::indicators::{atr, bollinger, ema, range_frac, realized_vol, returns, rsi, sma};

/// Every key `make_features` emits, in assembly order.
pub const FEATURE_NAMES: [&str; 24] = [
    "ret_1",
    "ret_5",
    "ret_10",
    "ret_20",
    "rsi7",
    "rsi14",
    "rsi28",
    "rv_24",
    "rv_48",
    "rv_72",
    "range_frac",
    "bb20_mid",
    "bb20_upper",
    "bb20_lower",
    "bb20_pctb",
    "bb20_bw",
    "sma20",
    "sma50",
    "ema12",
    "ema26",
    "macd",
    "macd_signal",
    "macd_hist",
    "atr14",
];

/// Compute the full feature vocabulary for a bar series.
///
/// Output has exactly one row per bar, in input order, with the bar's
/// timestamp and symbol copied over. Warm-up values are NaN.
pub fn make_features(bars: &[Bar]) -> Vec<FeatureRow> {
    let n = bars.len();
    let closes = closes(bars);

    let bb20 = bollinger(&closes, 20, 2.0);
    let ema12 = ema(&closes, 12);
    let ema26 = ema(&closes, 26);

    let macd: Vec<f64> = ema12
        .iter()
        .zip(&ema26)
        .map(|(fast, slow)| both_defined(*fast, *slow, |a, b| a - b))
        .collect();
    let macd_signal = ema(&macd, 9);
    let macd_hist: Vec<f64> = macd
        .iter()
        .zip(&macd_signal)
        .map(|(m, s)| both_defined(*m, *s, |a, b| a - b))
        .collect();

    // Same order as FEATURE_NAMES.
    let columns: [Vec<f64>; 24] = [
        returns(&closes, 1),
        returns(&closes, 5),
        returns(&closes, 10),
        returns(&closes, 20),
        rsi(&closes, 7),
        rsi(&closes, 14),
        rsi(&closes, 28),
        realized_vol(&closes, 24),
        realized_vol(&closes, 48),
        realized_vol(&closes, 72),
        range_frac(bars),
        bb20.mid,
        bb20.upper,
        bb20.lower,
        bb20.pctb,
        bb20.bandwidth,
        sma(&closes, 20),
        sma(&closes, 50),
        ema12,
        ema26,
        macd,
        macd_signal,
        macd_hist,
        atr(bars, 14),
    ];

    let mut rows = Vec::with_capacity(n);
    for (i, bar) in bars.iter().enumerate() {
        let mut row = FeatureRow::new(bar.timestamp, bar.symbol.clone());
        for (name, column) in FEATURE_NAMES.iter().zip(&columns) {
            row.insert(*name, column[i]);
        }
        rows.push(row);
    }

    rows
}

fn both_defined(a: f64, b: f64, f: impl Fn(f64, f64) -> f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        f(a, b)
    }
}
