//! API Adapters - CLOB and Data-API HTTP Layer
//!
//! REST access to the two off-chain services the CLI talks to:
//! - the CLOB (markets, order books, order placement, API keys)
//! - the data API (wallet positions)

pub mod auth;
pub mod client;
pub mod markets;
pub mod orders;
pub mod positions;
pub mod types;

pub use auth::ClobAuth;
pub use client::ClobClient;
pub use positions::DataApiPositions;
