pub mod catalog;
pub mod provider;
pub mod tool;

pub use catalog::{Catalog, MovieMatch, MovieQuery};
pub use provider::{
    ChatRequest, GenerationResult, Provider, Role, ToolCall, ToolResponse, Turn, TurnContent,
};
pub use tool::{Tool, ToolResult, ToolSpec};
