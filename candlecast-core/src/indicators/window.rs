//! Fixed-size trailing window shared by the rolling indicators.
//!
//! Holds at most `capacity` samples. A statistic is only meaningful once the
//! window is full; callers check `is_full()` before emitting a value.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    /// Push a sample, evicting the oldest one once the window is full.
    pub fn push(&mut self, value: f64) {
        let mut resum = !value.is_finite();
        if self.buf.len() == self.capacity {
            if let Some(leaving) = self.buf.pop_front() {
                if leaving.is_finite() {
                    self.sum -= leaving;
                } else {
                    resum = true;
                }
            }
        }
        self.buf.push_back(value);

        // A non-finite sample poisons the running sum; rebuild it from the
        // buffer so the window recovers once that sample has left.
        if resum {
            self.sum = self.buf.iter().sum();
        } else {
            self.sum += value;
        }
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Arithmetic mean of the samples currently held.
    pub fn mean(&self) -> f64 {
        if self.buf.is_empty() {
            return f64::NAN;
        }
        self.sum / self.buf.len() as f64
    }

    /// Population standard deviation (divide by N) of the samples held.
    pub fn std_dev(&self) -> f64 {
        if self.buf.is_empty() {
            return f64::NAN;
        }
        let mean = self.mean();
        let variance = self
            .buf
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.buf.len() as f64;
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn fills_then_slides() {
        let mut w = RollingWindow::new(3);
        w.push(1.0);
        w.push(2.0);
        assert!(!w.is_full());
        w.push(3.0);
        assert!(w.is_full());
        assert_approx(w.mean(), 2.0, DEFAULT_EPSILON);
        w.push(10.0);
        assert_eq!(w.len(), 3);
        assert_approx(w.mean(), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn population_std_dev() {
        let mut w = RollingWindow::new(4);
        for v in [2.0, 4.0, 4.0, 6.0] {
            w.push(v);
        }
        // mean 4, squared deviations 4+0+0+4 = 8, /4 = 2
        assert_approx(w.std_dev(), 2.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn recovers_after_nan_leaves() {
        let mut w = RollingWindow::new(2);
        w.push(f64::NAN);
        w.push(1.0);
        assert!(w.mean().is_nan());
        w.push(3.0);
        assert_approx(w.mean(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_window_is_nan() {
        let w = RollingWindow::new(5);
        assert!(w.is_empty());
        assert!(w.mean().is_nan());
        assert!(w.std_dev().is_nan());
    }
}
