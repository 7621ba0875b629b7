//! Tools that agents can call
//!
//! A [`Tool`] is a named async function over JSON. The [`ToolRegistry`]
//! holds the tools one runtime exposes to its agents; the property crate
//! registers dataset lookups and web research there.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
