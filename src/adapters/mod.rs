//! Adapters - External System Integration Layer
//!
//! Concrete implementations of the ports:
//! - `api`: CLOB and data-API REST clients
//! - `chain`: Polygon RPC, fee estimation, contract calls
//! - `persistence`: local market cache

pub mod api;
pub mod chain;
pub mod persistence;
