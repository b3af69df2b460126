//! Taskkeep: lifecycle and retention engine for a personal task tracker.
//!
//! Tasks are created, edited, completed, filtered and soft-deleted. Deleted
//! tasks stay restorable for a fixed retention window and are then purged
//! by a background sweeper.
//!
//! # Architecture
//!
//! Taskkeep follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (memory, filesystem)
//!
//! # Modules
//!
//! - [`config`]: Runtime configuration loading
//! - [`task`]: Task lifecycle, queries and retention

pub mod config;
pub mod task;
