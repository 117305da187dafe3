use crate::agent::transcript::{Exchange, Transcript};
use crate::agent::{ContextBuilder, ToolRegistry};
use crate::error::AgentError;
use crate::traits::{ChatRequest, GenerationResult, Provider, ToolSpec};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_TOOL_CALLS: usize = 5;

pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    system_instruction: String,
    tool_registry: Arc<ToolRegistry>,
    max_tool_calls: usize,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        context_builder: ContextBuilder,
        tool_registry: Arc<ToolRegistry>,
    ) -> Self {
        let context_builder = context_builder.with_tool_specs(tool_registry.get_specs());
        Self {
            provider,
            system_instruction: context_builder.build_system_instruction(),
            tool_registry,
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
        }
    }

    pub fn with_max_tool_calls(mut self, max: usize) -> Self {
        self.max_tool_calls = max;
        self
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Resolves one user message, running every tool call the backend asks
    /// for, and returns the final answer.
    ///
    /// The transcript only grows when the turn completes. On error nothing
    /// is appended, so a failed turn leaves no dangling user or call turns.
    pub async fn process(
        &self,
        transcript: &mut Transcript,
        message: &str,
    ) -> Result<String, AgentError> {
        let tools = self.tool_registry.get_specs();
        let mut exchange = Exchange::new(message);

        loop {
            let offer_tools = !tools.is_empty() && exchange.tool_calls() < self.max_tool_calls;
            let response = self.generate(transcript, &exchange, &tools, offer_tools).await?;

            match response {
                GenerationResult::Text(text) => {
                    debug!(
                        tool_calls = exchange.tool_calls(),
                        chars = text.len(),
                        "Turn resolved"
                    );
                    transcript.append(exchange.complete(text.clone()));
                    return Ok(text);
                }
                GenerationResult::ToolCall(call) => {
                    if exchange.tool_calls() >= self.max_tool_calls {
                        warn!(
                            tool = %call.name,
                            limit = self.max_tool_calls,
                            "Backend requested a tool after the limit"
                        );
                        return Err(AgentError::ToolCallLimit(self.max_tool_calls));
                    }

                    info!(tool = %call.name, arguments = %call.arguments, "Backend requested tool");
                    let result = self.tool_registry.dispatch(&call).await;
                    exchange.record_tool_call(call, result);
                }
            }
        }
    }

    async fn generate(
        &self,
        transcript: &Transcript,
        exchange: &Exchange,
        tools: &[ToolSpec],
        offer_tools: bool,
    ) -> Result<GenerationResult, AgentError> {
        let request = ChatRequest {
            system_instruction: &self.system_instruction,
            history: transcript.turns(),
            pending: exchange.turns(),
            tools: offer_tools.then_some(tools),
        };
        Ok(self.provider.generate(request).await?)
    }
}
