//! Adapter implementations of the task ports.

pub mod fs;
pub mod memory;
