//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! All five outputs come from one pass over the trailing window:
//! - mid: mean(close, window)
//! - upper / lower: mid +/- k * stddev(close, window)
//! - pctb: (close - lower) / (upper - lower), unguarded (NaN/Inf on a flat window)
//! - bandwidth: (upper - lower) / mid, with mid taken as 1.0 when it is exactly 0
//!
//! Uses population stddev (divide by N). First valid value at index window-1.

use super::window::RollingWindow;

/// The five Bollinger series, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub mid: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub pctb: Vec<f64>,
    pub bandwidth: Vec<f64>,
}

impl BollingerBands {
    fn warmup(n: usize) -> Self {
        Self {
            mid: vec![f64::NAN; n],
            upper: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
            pctb: vec![f64::NAN; n],
            bandwidth: vec![f64::NAN; n],
        }
    }
}

pub fn bollinger(closes: &[f64], window: usize, k: f64) -> BollingerBands {
    assert!(window >= 1, "Bollinger window must be >= 1");
    let mut bands = BollingerBands::warmup(closes.len());
    let mut win = RollingWindow::new(window);

    for (i, &close) in closes.iter().enumerate() {
        win.push(close);
        if !win.is_full() {
            continue;
        }

        let mid = win.mean();
        let stddev = win.std_dev();
        let upper = mid + k * stddev;
        let lower = mid - k * stddev;
        let denom = if mid != 0.0 { mid } else { 1.0 };

        bands.mid[i] = mid;
        bands.upper[i] = upper;
        bands.lower[i] = lower;
        bands.pctb[i] = (close - lower) / (upper - lower);
        bands.bandwidth[i] = (upper - lower) / denom;
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_mid_is_sma() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        assert!(bands.mid[0].is_nan());
        assert!(bands.mid[1].is_nan());
        assert_approx(bands.mid[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.mid[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bands = bollinger(&[10.0, 11.0, 9.0, 13.0, 14.0, 12.5], 3, 2.0);
        for i in 2..6 {
            let half_width = bands.upper[i] - bands.mid[i];
            assert_approx(bands.mid[i] - bands.lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_known_values() {
        // Window [2, 4, 6]: mean 4, population variance 8/3
        let bands = bollinger(&[2.0, 4.0, 6.0], 3, 2.0);
        let sd = (8.0_f64 / 3.0).sqrt();
        assert_approx(bands.upper[2], 4.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 4.0 - 2.0 * sd, DEFAULT_EPSILON);
        // close 6 relative to band of width 4*sd starting at 4-2sd
        assert_approx(bands.pctb[2], (2.0 + 2.0 * sd) / (4.0 * sd), DEFAULT_EPSILON);
        assert_approx(bands.bandwidth[2], 4.0 * sd / 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_constant_price_collapses() {
        let bands = bollinger(&[100.0, 100.0, 100.0, 100.0], 3, 2.0);
        assert_approx(bands.upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.bandwidth[2], 0.0, DEFAULT_EPSILON);
        // zero-width band: pctb is 0/0
        assert!(bands.pctb[2].is_nan());
    }

    #[test]
    fn bollinger_zero_mid_uses_unit_denominator() {
        let bands = bollinger(&[-1.0, 1.0], 2, 1.0);
        // mean 0, stddev 1 → width 2, divided by 1.0 instead of 0
        assert_approx(bands.bandwidth[1], 2.0, DEFAULT_EPSILON);
    }
}
