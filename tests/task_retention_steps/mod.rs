//! Step definitions for task retention scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
