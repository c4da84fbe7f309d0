//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(window+1).
//! Seed: EMA[0] = x[0]. No warm-up, so the output is defined from the first
//! index on (given a NaN-free input).

pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "EMA window must be >= 1");
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = first;
    result.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}
