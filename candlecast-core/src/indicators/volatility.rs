//! Realized volatility.
//!
//! Rolling population stddev of one-period simple returns. The first return
//! exists at index 1, so the first valid value is at index `window`.

use super::window::RollingWindow;

pub fn realized_vol(closes: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "realized vol window must be >= 1");
    let mut result = vec![f64::NAN; closes.len()];
    let mut win = RollingWindow::new(window);

    for i in 1..closes.len() {
        let prev = closes[i - 1];
        win.push((closes[i] - prev) / prev);
        if win.is_full() {
            result[i] = win.std_dev();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn constant_growth_has_zero_vol() {
        let closes: Vec<f64> = (0..6).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let result = realized_vol(&closes, 3);
        assert!(result[2].is_nan());
        for v in &result[3..] {
            assert_approx(*v, 0.0, 1e-12);
        }
    }

    #[test]
    fn alternating_returns() {
        // returns: +0.1, -0.1 (from 110 to 99), window 2 → stddev 0.1
        let result = realized_vol(&[100.0, 110.0, 99.0], 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_all_nan() {
        let result = realized_vol(&[100.0, 101.0], 24);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
