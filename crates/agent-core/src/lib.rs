//! Core abstractions shared by the property research agents
//!
//! Every other crate in the workspace builds on the [`Agent`] trait, the
//! [`Context`] bag that flows between agents and tasks, and the common
//! [`Error`] type defined here.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
