//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod logging;

pub use logging::{init_tracing, Redactor};
