//! Nullable infrastructure for deterministic testing.
//!
//! The core's two external seams (the administrative gate and the event
//! observer) are traits. This crate provides implementations that:
//! - Return deterministic answers
//! - Can be inspected programmatically
//! - Never touch anything outside the process
//!
//! Usage: swap real implementations for nullables in tests.

pub mod admin;
pub mod sink;

pub use admin::NullAdmin;
pub use sink::{NullSink, RecordingSink};
