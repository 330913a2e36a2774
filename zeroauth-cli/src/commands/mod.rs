//! CLI command implementations.

pub mod schedule;
pub mod status;
pub mod verify;
