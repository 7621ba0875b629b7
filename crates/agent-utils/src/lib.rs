//! Shared utilities for the property research workspace
//!
//! Logging setup and environment-driven configuration helpers used by the
//! LLM adapters, the property crate and the CLI.

pub mod config;
pub mod logging;

pub use config::{Config, env_flag, env_or, env_string};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
