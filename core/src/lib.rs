pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod providers;
pub mod tools;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{AgentLoop, ContextBuilder, Session, ToolRegistry, Transcript};
pub use config::*;
pub use error::*;
pub use providers::*;
pub use tools::*;
pub use traits::*;
