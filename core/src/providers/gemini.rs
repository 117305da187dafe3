use crate::config::GenerationConfig;
use crate::error::BackendError;
use crate::traits::{
    ChatRequest, GenerationResult, Provider, ToolCall, ToolResult, ToolSpec, TurnContent,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool<'a>>>,
    generation_config: GeminiGenerationConfig,
    safety_settings: Vec<GeminiSafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum GeminiPart<'a> {
    Text(&'a str),
    FunctionCall {
        name: &'a str,
        args: &'a serde_json::Value,
    },
    FunctionResponse {
        name: &'a str,
        response: &'a ToolResult,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool<'a> {
    function_declarations: Vec<GeminiFunctionDeclaration<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

/// Google Gemini `generateContent` backend.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    generation: GenerationConfig,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
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

    fn build_request<'a>(&self, request: ChatRequest<'a>) -> GeminiRequest<'a> {
        GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart::Text(request.system_instruction)],
            },
            contents: request
                .turns()
                .map(|turn| GeminiContent {
                    role: Some(turn.role.as_str()),
                    parts: vec![match &turn.content {
                        TurnContent::Text(text) => GeminiPart::Text(text),
                        TurnContent::FunctionCall(call) => GeminiPart::FunctionCall {
                            name: &call.name,
                            args: &call.arguments,
                        },
                        TurnContent::FunctionResponse(response) => GeminiPart::FunctionResponse {
                            name: &response.name,
                            response: &response.response,
                        },
                    }],
                })
                .collect(),
            tools: request.tools.map(convert_tools),
            generation_config: GeminiGenerationConfig {
                temperature: self.generation.temperature,
                top_p: self.generation.top_p,
                top_k: self.generation.top_k,
                max_output_tokens: self.generation.max_output_tokens,
                response_mime_type: "text/plain",
            },
            safety_settings: vec![GeminiSafetySetting {
                category: "HARM_CATEGORY_HARASSMENT",
                threshold: "BLOCK_NONE",
            }],
        }
    }
}

fn convert_tools(tools: &[ToolSpec]) -> Vec<GeminiTool<'_>> {
    vec![GeminiTool {
        function_declarations: tools
            .iter()
            .map(|t| GeminiFunctionDeclaration {
                name: &t.name,
                description: &t.description,
                parameters: &t.parameters,
            })
            .collect(),
    }]
}

fn parse_response(response: GeminiResponse) -> Result<GenerationResult, BackendError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(BackendError::EmptyResponse)?;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let mut calls = parts.iter().filter_map(|p| p.function_call.as_ref());
    if let Some(call) = calls.next() {
        let ignored = calls.count();
        if ignored > 0 {
            warn!(tool = %call.name, ignored, "Backend requested several calls; using the first");
        }
        let arguments = if call.args.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            call.args.clone()
        };
        return Ok(GenerationResult::ToolCall(ToolCall {
            id: None,
            name: call.name.clone(),
            arguments,
        }));
    }

    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    if !text.trim().is_empty() {
        return Ok(GenerationResult::Text(text));
    }

    match candidate.finish_reason {
        Some(reason)
            if matches!(
                reason.as_str(),
                "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
            ) =>
        {
            Err(BackendError::Blocked(reason))
        }
        _ => Err(BackendError::EmptyResponse),
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: ChatRequest<'_>) -> Result<GenerationResult, BackendError> {
        let gemini_request = self.build_request(request);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await?;

        let status = response.status();
        debug!(model = %self.model, status = status.as_u16(), "Gemini response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let gemini_response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        parse_response(gemini_response)
    }
}
