//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), defined
//! from index 1 (index 0 has no previous close).
//! ATR is the simple rolling mean of TR over a trailing window, so the first
//! valid value is at index `window`.

use super::window::RollingWindow;
use crate::domain::Bar;

/// True Range series. TR[0] is NaN.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = vec![f64::NAN; bars.len()];
    for i in 1..bars.len() {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

pub fn atr(bars: &[Bar], window: usize) -> Vec<f64> {
    assert!(window >= 1, "ATR window must be >= 1");
    let tr = true_range(bars);
    let mut result = vec![f64::NAN; bars.len()];
    let mut win = RollingWindow::new(window);

    for i in 1..bars.len() {
        win.push(tr[i]);
        if win.is_full() {
            result[i] = win.mean();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // no previous close
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_window_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR undefined
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = atr(&bars, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        // mean(8, 9, 6), then mean(9, 6, 6)
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_empty() {
        assert!(atr(&[], 14).is_empty());
    }
}
