//! Foundation module - Core utilities shared across the crate
//!
//! - Logging utilities

pub mod logging;
