//! Task lifecycle management.
//!
//! This module owns the active and deleted task collections, the state
//! transitions between them, read-time expiry, filtering and statistics,
//! and the periodic purge of deleted tasks once their retention window has
//! elapsed. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
