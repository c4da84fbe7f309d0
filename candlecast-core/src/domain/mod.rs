//! Domain types: bars in, feature rows out.

pub mod bar;
pub mod feature_row;

pub use bar::{closes, Bar};
pub use feature_row::FeatureRow;
