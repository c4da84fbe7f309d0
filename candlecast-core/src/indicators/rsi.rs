//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses.
//! Seed at index `window`: simple mean of the gains/losses of the first
//! `window` price changes. Afterwards avg = (avg * (window-1) + current) / window.
//! RSI = 100 - 100 / (1 + RS), RS = avg_gain / avg_loss, and RS = 0 when
//! avg_loss == 0 (so a series with no losses reads 0, not 100).

pub fn rsi(closes: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "RSI window must be >= 1");
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    let w = window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i < window {
            avg_gain += gain;
            avg_loss += loss;
            continue;
        }

        if i == window {
            avg_gain = (avg_gain + gain) / w;
            avg_loss = (avg_loss + loss) / w;
        } else {
            avg_gain = (avg_gain * (w - 1.0) + gain) / w;
            avg_loss = (avg_loss * (w - 1.0) + loss) / w;
        }

        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        0.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
