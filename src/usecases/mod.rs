//! Use Cases Layer - Command Orchestration
//!
//! Sequences port operations to implement the CLI's multi-transaction
//! workflows. Each use case is a self-contained business operation,
//! constructed per command invocation with its dependencies injected
//! (no process-wide singletons).
//!
//! Use cases:
//! - `allowance::SetAllowance`: Sequenced USDC.e approvals for the exchanges
//! - `redeem::RedeemPositions`: Batch redemption of resolved markets

pub mod allowance;
pub mod redeem;
