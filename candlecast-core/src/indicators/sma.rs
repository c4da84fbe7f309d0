//! Simple Moving Average (SMA).
//!
//! Rolling mean of a series over a trailing window.
//! First valid value at index window-1.

use super::window::RollingWindow;

pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "SMA window must be >= 1");
    let mut result = vec![f64::NAN; values.len()];
    let mut win = RollingWindow::new(window);

    for (i, &v) in values.iter().enumerate() {
        win.push(v);
        if win.is_full() {
            result[i] = win.mean();
        }
    }

    result
}
