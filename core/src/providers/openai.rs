use crate::config::GenerationConfig;
use crate::error::BackendError;
use crate::traits::{ChatRequest, GenerationResult, Provider, Role, ToolCall, ToolSpec, TurnContent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool<'a>>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCallRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIToolCallRequest {
    id: String,
    r#type: &'static str,
    function: OpenAIFunctionRequest,
}

#[derive(Debug, Serialize)]
struct OpenAIFunctionRequest {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct OpenAITool<'a> {
    r#type: &'static str,
    function: OpenAIToolFunction<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAIToolFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

/// OpenAI-compatible chat-completions backend.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    generation: GenerationConfig,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    fn convert_messages(&self, request: ChatRequest<'_>) -> Vec<OpenAIMessage> {
        let mut messages = vec![OpenAIMessage {
            role: "system",
            content: Some(request.system_instruction.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }];

        // Calls from backends without ids get synthetic ones; a response
        // always follows its call, so it reuses the last id handed out.
        let mut last_call_id = String::new();
        let mut synthetic = 0usize;

        for turn in request.turns() {
            let message = match &turn.content {
                TurnContent::Text(text) => OpenAIMessage {
                    role: match turn.role {
                        Role::User => "user",
                        Role::Model => "assistant",
                    },
                    content: Some(text.clone()),
                    tool_calls: None,
                    tool_call_id: None,
                },
                TurnContent::FunctionCall(call) => {
                    last_call_id = call.id.clone().unwrap_or_else(|| {
                        synthetic += 1;
                        format!("call_{synthetic}")
                    });
                    OpenAIMessage {
                        role: "assistant",
                        content: None,
                        tool_calls: Some(vec![OpenAIToolCallRequest {
                            id: last_call_id.clone(),
                            r#type: "function",
                            function: OpenAIFunctionRequest {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        }]),
                        tool_call_id: None,
                    }
                }
                TurnContent::FunctionResponse(response) => OpenAIMessage {
                    role: "tool",
                    content: Some(serde_json::to_string(&response.response).unwrap_or_default()),
                    tool_calls: None,
                    tool_call_id: Some(
                        response.id.clone().unwrap_or_else(|| last_call_id.clone()),
                    ),
                },
            };
            messages.push(message);
        }

        messages
    }

    fn convert_tools<'a>(&self, tools: &'a [ToolSpec]) -> Vec<OpenAITool<'a>> {
        tools
            .iter()
            .map(|t| OpenAITool {
                r#type: "function",
                function: OpenAIToolFunction {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect()
    }
}

fn parse_response(response: OpenAIResponse) -> Result<GenerationResult, BackendError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(BackendError::EmptyResponse)?;

    let mut calls = choice.message.tool_calls.unwrap_or_default().into_iter();
    if let Some(call) = calls.next() {
        if calls.len() > 0 {
            warn!(tool = %call.function.name, ignored = calls.len(), "Backend requested several calls; using the first");
        }
        let arguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
            BackendError::Decode(format!(
                "Failed to parse tool arguments for {}: {}",
                call.function.name, e
            ))
        })?;
        return Ok(GenerationResult::ToolCall(ToolCall {
            id: Some(call.id),
            name: call.function.name,
            arguments,
        }));
    }

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(GenerationResult::Text(text)),
        _ => Err(BackendError::EmptyResponse),
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: ChatRequest<'_>) -> Result<GenerationResult, BackendError> {
        let openai_request = OpenAIRequest {
            model: &self.model,
            messages: self.convert_messages(request),
            tools: request.tools.map(|t| self.convert_tools(t)),
            temperature: self.generation.temperature,
            top_p: self.generation.top_p,
            max_tokens: self.generation.max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await?;

        let status = response.status();
        debug!(model = %self.model, status = status.as_u16(), "OpenAI response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let openai_response: OpenAIResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        parse_response(openai_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ToolResult, Turn};
    use serde_json::{Value, json};

    fn decode(body: Value) -> Result<GenerationResult, BackendError> {
        parse_response(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn messages_pair_calls_with_responses() {
        let call = ToolCall {
            id: None,
            name: "find_streaming_platforms".to_string(),
            arguments: json!({ "title": "Duna" }),
        };
        let pending = vec![
            Turn::user("onde vejo Duna?"),
            Turn::function_call(call.clone()),
            Turn::function_response(&call, ToolResult::new("Max")),
        ];
        let provider = OpenAIProvider::new("key");

        let messages = serde_json::to_value(provider.convert_messages(ChatRequest {
            system_instruction: "Seja gentil.",
            history: &[Turn::user("oi"), Turn::model("Olá!")],
            pending: &pending,
            tools: None,
        }))
        .unwrap();

        assert_eq!(
            messages,
            json!([
                { "role": "system", "content": "Seja gentil." },
                { "role": "user", "content": "oi" },
                { "role": "assistant", "content": "Olá!" },
                { "role": "user", "content": "onde vejo Duna?" },
                { "role": "assistant", "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "find_streaming_platforms", "arguments": "{\"title\":\"Duna\"}" }
                }] },
                { "role": "tool", "content": "{\"result\":\"Max\"}", "tool_call_id": "call_1" }
            ])
        );
    }

    #[test]
    fn tool_call_arguments_are_parsed() {
        let result = decode(json!({
            "choices": [{ "message": { "content": null, "tool_calls": [{
                "id": "call_abc",
                "type": "function",
                "function": { "name": "find_streaming_platforms", "arguments": "{\"title\":\"Duna\",\"year\":2021}" }
            }] } }]
        }));

        assert_eq!(
            result.unwrap(),
            GenerationResult::ToolCall(ToolCall {
                id: Some("call_abc".to_string()),
                name: "find_streaming_platforms".to_string(),
                arguments: json!({ "title": "Duna", "year": 2021 }),
            })
        );
    }

    #[test]
    fn malformed_arguments_are_a_decode_error() {
        let result = decode(json!({
            "choices": [{ "message": { "tool_calls": [{
                "id": "call_abc",
                "function": { "name": "find_streaming_platforms", "arguments": "{title" }
            }] } }]
        }));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn text_answer() {
        let result = decode(json!({ "choices": [{ "message": { "content": "Veja Amélie." } }] }));
        assert_eq!(result.unwrap(), GenerationResult::Text("Veja Amélie.".to_string()));
    }

    #[test]
    fn empty_answer_is_an_error() {
        assert!(matches!(decode(json!({ "choices": [] })), Err(BackendError::EmptyResponse)));
        let result = decode(json!({ "choices": [{ "message": { "content": "" } }] }));
        assert!(matches!(result, Err(BackendError::EmptyResponse)));
    }
}
