pub mod evaluator;
pub mod types;

pub use evaluator::{detect, find_high, find_low, price_spread};
pub use types::{ArbitrageSignal, PriceExtreme, PriceSpread};
