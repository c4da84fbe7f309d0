//! Close position within the bar's range.
//!
//! range_frac = (close - low) / (high - low) when high > low, NaN otherwise.
//! No lookback.

use crate::domain::Bar;

pub fn range_frac(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .map(|bar| {
            let range = bar.high - bar.low;
            if range > 0.0 {
                (bar.close - bar.low) / range
            } else {
                f64::NAN
            }
        })
        .collect()
}
