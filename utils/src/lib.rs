//! Shared utilities for the ballot workspace.

pub mod logging;

pub use logging::init_tracing;
