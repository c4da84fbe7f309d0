//! Simple returns over a fixed lag.
//!
//! ret[i] = (close[i] - close[i-lag]) / close[i-lag], NaN for i < lag.
//! A zero reference price is not guarded and yields Inf/NaN.

pub fn returns(closes: &[f64], lag: usize) -> Vec<f64> {
    assert!(lag >= 1, "returns lag must be >= 1");
    let mut result = vec![f64::NAN; closes.len()];
    for i in lag..closes.len() {
        let base = closes[i - lag];
        result[i] = (closes[i] - base) / base;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn returns_lag_1() {
        let result = returns(&[100.0, 110.0, 99.0], 1);
        assert!(result[0].is_nan());
        assert_approx(result[1], 0.1, DEFAULT_EPSILON);
        assert_approx(result[2], -0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn returns_lag_longer_than_series() {
        let result = returns(&[1.0, 2.0, 3.0], 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn returns_zero_base_is_unguarded() {
        let result = returns(&[0.0, 5.0, 0.0], 1);
        assert!(result[1].is_infinite());
        assert_approx(result[2], -1.0, DEFAULT_EPSILON);
    }
}
