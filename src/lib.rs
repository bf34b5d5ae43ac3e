//! pmarket-cli - Command-line Polymarket Client
//!
//! Trades and redeems Polymarket positions from the terminal: market
//! discovery through the CLOB API, order placement with EIP-712
//! signatures, and on-chain redemption of resolved markets via
//! alloy-rs.
//!
//! # Architecture
//!
//! Hexagonal layout:
//! - `domain`: pure types and math (amounts, fees, grouping)
//! - `ports`: traits the use cases depend on
//! - `usecases`: the allowance and redemption orchestrators
//! - `adapters`: CLOB/data-API HTTP, Polygon chain access, local cache
//! - `cli`: command implementations
//! - `config`: TOML config and credential storage

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
