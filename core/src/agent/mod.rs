pub mod context;
pub mod loop_;
pub mod registry;
pub mod session;
pub mod transcript;

pub use context::ContextBuilder;
pub use loop_::AgentLoop;
pub use registry::ToolRegistry;
pub use session::{Reply, Session};
pub use transcript::Transcript;
