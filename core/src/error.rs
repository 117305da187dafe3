use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. None of these are recoverable: the process must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key for {provider}: set one of {} or `api_key` in the config file", .vars.join(", "))]
    MissingCredential {
        provider: &'static str,
        vars: &'static [&'static str],
    },

    #[error("Failed to read config from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown provider: {0}. Available: gemini, openai")]
    UnknownProvider(String),
}

/// Failures of the language backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend blocked the request: {0}")]
    Blocked(String),

    #[error("Empty response from backend: no text or function call")]
    EmptyResponse,

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

/// Failures of the movie catalog. Never leaves the tool that hit it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure. The request URL carries the API key, so it is
    /// stripped before the error is built.
    #[error("Catalog request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Catalog API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Http(e.without_url())
    }
}

/// Why a dispatched tool call produced no result of its own.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Backend kept requesting tools after {0} calls in a single turn")]
    ToolCallLimit(usize),
}
