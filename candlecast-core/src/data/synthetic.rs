//! Seeded random-walk bars for demos, tests and benches.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

const START_PRICE: f64 = 100.0;

/// 2024-01-01 00:00:00 UTC.
const START_EPOCH_SECS: i64 = 1_704_067_200;

/// `n` hourly bars starting at 2024-01-01 00:00 UTC.
///
/// Each bar opens at the previous close and moves by at most ±3%; high and
/// low extend up to 1% beyond the body. Same seed, same series.
pub fn synthetic_bars(symbol: &str, n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(START_EPOCH_SECS);

    let mut bars = Vec::with_capacity(n);
    let mut price = START_PRICE;
    for i in 0..n {
        let step: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + step);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500.0..5_000.0);

        bars.push(Bar {
            timestamp: start + Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume,
            symbol: symbol.to_string(),
        });
        price = close;
    }
    bars
}
