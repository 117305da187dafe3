use crate::error::BackendError;
use crate::traits::{ToolResult, ToolSpec};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A function invocation requested by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Backend-assigned call id. Gemini does not assign one.
    pub id: Option<String>,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The result of a [`ToolCall`], as fed back to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub id: Option<String>,
    pub name: String,
    pub response: ToolResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    Text(String),
    FunctionCall(ToolCall),
    FunctionResponse(ToolResponse),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: TurnContent::Text(text.into()),
        }
    }

    pub fn function_call(call: ToolCall) -> Self {
        Self {
            role: Role::Model,
            content: TurnContent::FunctionCall(call),
        }
    }

    pub fn function_response(call: &ToolCall, response: ToolResult) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::FunctionResponse(ToolResponse {
                id: call.id.clone(),
                name: call.name.clone(),
                response,
            }),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            TurnContent::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self.content, TurnContent::FunctionCall(_))
    }

    pub fn is_function_response(&self) -> bool {
        matches!(self.content, TurnContent::FunctionResponse(_))
    }
}

/// What the backend produced for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Text(String),
    ToolCall(ToolCall),
}

/// One stateless generation request.
///
/// The backend keeps no state between calls, so every request carries the
/// whole conversation: the committed `history` followed by the `pending`
/// turns of the exchange currently being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    pub history: &'a [Turn],
    pub pending: &'a [Turn],
    pub tools: Option<&'a [ToolSpec]>,
}

impl<'a> ChatRequest<'a> {
    pub fn turns(self) -> impl Iterator<Item = &'a Turn> {
        self.history.iter().chain(self.pending.iter())
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: ChatRequest<'_>) -> Result<GenerationResult, BackendError>;
}
