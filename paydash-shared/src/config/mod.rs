//! # Configuration
//!
//! Client-side configuration for the `PayDash` library and CLI.

pub mod client;

pub use client::{ClientConfig, ConfigError, LogFormat, LoggingConfig};
