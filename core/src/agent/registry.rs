use crate::error::ToolError;
use crate::traits::{Tool, ToolCall, ToolResult, ToolSpec};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A [`Tool`] with its argument type erased, so tools of different
/// argument types can share one map.
#[async_trait]
trait ToolObject: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn call(&self, arguments: Value) -> Result<ToolResult, ToolError>;
}

struct AnyTool<T: Tool>(T);

#[async_trait]
impl<T: Tool> ToolObject for AnyTool<T> {
    fn spec(&self) -> ToolSpec {
        self.0.spec()
    }

    async fn call(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: T::Args =
            serde_json::from_value(arguments).map_err(ToolError::InvalidArguments)?;
        Ok(self.0.execute(args).await?)
    }
}

/// Tools the backend may call, keyed by declared name. Filled at startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn ToolObject>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Box::new(AnyTool(tool))).is_some() {
            warn!(tool = %name, "Replacing previously registered tool");
        }
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    /// Runs `call` and always yields a result the backend can read, including
    /// for unknown tools, bad arguments and failed executions.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "Backend requested an unknown tool");
            return ToolResult::new(format!("Ferramenta '{}' não encontrada.", call.name));
        };

        debug!(tool = %call.name, arguments = %call.arguments, "Executing tool");
        match tool.call(call.arguments.clone()).await {
            Ok(result) => result,
            Err(ToolError::InvalidArguments(e)) => {
                warn!(tool = %call.name, error = %e, "Rejected tool arguments");
                ToolResult::new(format!("Argumentos inválidos para '{}': {}.", call.name, e))
            }
            Err(ToolError::Execution(e)) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                ToolResult::new(format!("Falha ao executar '{}': {}", call.name, e))
            }
        }
    }
}
