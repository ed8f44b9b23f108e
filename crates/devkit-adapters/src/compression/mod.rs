//! Remote image compression adapters.

mod tinypng;

pub use tinypng::{DEFAULT_ENDPOINT, TinyPngClient};
