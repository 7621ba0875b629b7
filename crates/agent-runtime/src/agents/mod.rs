//! Concrete agent implementations
//!
//! - [`SimpleAgent`]: one completion per input, no tools
//! - [`ToolAgent`]: the executor loop with tool calls
//!
//! Both carry an [`AgentProfile`] describing the role they play.

pub mod profile;
pub mod simple;
pub mod tool;

pub use profile::AgentProfile;
pub use simple::{SimpleAgent, SimpleConfig};
pub use tool::ToolAgent;
