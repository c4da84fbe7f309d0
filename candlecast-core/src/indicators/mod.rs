//! Indicator engine.
//!
//! Pure, stateless functions over a close series (or a bar series). Every
//! function returns a vector the same length as its input and marks the
//! warm-up region with `f64::NAN`. Indicators never fail: an undefined value
//! is data, not an error.
//!
//! Rolling statistics share `RollingWindow`, which only reports a value once
//! it holds exactly `window` samples.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod range;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod volatility;
pub mod window;

pub use atr::{atr, true_range};
pub use bollinger::{bollinger, BollingerBands};
pub use ema::ema;
pub use range::range_frac;
pub use returns::returns;
pub use rsi::rsi;
pub use sma::sma;
pub use volatility::realized_vol;
pub use window::RollingWindow;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_bars(&data)
}

/// Create bars from explicit `(open, high, low, close)` tuples, one hour apart.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| crate::domain::Bar {
            timestamp: base + chrono::Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
            symbol: "TEST".to_string(),
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
