//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `positions`: Wallet position snapshots from the data API
//! - `chain`: On-chain classification, approvals, and redemptions

pub mod chain;
pub mod positions;
