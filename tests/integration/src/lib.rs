//! Integration test utilities for the issue relay
//!
//! Spawns the full HTTP stack over the in-memory store and spy trackers,
//! then drives it with real webhook deliveries.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
