//! Persistence Adapters - Local File-backed State

pub mod market_cache;

pub use market_cache::{CachedMarket, MarketCache};
