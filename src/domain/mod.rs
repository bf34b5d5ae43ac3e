//! Domain layer - Core business logic and models.
//!
//! Pure logic for the CLI: fee schedule derivation, position grouping,
//! redemption path classification, order amount math, and fixed-point
//! amount conversion. No external dependencies allowed here (hexagonal
//! architecture inner ring); everything is deterministic and testable
//! without touching the network.

pub mod fees;
pub mod order;
pub mod position;
pub mod redemption;
pub mod units;

// Re-export core types for convenience
pub use fees::FeeSchedule;
pub use position::{group_positions, ConditionId, GroupedRedemption, Position};
pub use redemption::{ClassifyError, RedemptionPath};
