//! Scripted stand-ins for the backend and the catalog.

use crate::error::{BackendError, CatalogError};
use crate::traits::{
    Catalog, ChatRequest, GenerationResult, MovieMatch, MovieQuery, Provider, ToolCall, Turn,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system_instruction: String,
    pub turns: Vec<Turn>,
    pub tool_names: Option<Vec<String>>,
}

/// Replies with a fixed script and records every request it receives.
pub struct StubProvider {
    script: Mutex<VecDeque<Result<GenerationResult, BackendError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubProvider {
    pub fn new(script: Vec<Result<GenerationResult, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(results: Vec<GenerationResult>) -> Self {
        Self::new(results.into_iter().map(Ok).collect())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, request: ChatRequest<'_>) -> Result<GenerationResult, BackendError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system_instruction: request.system_instruction.to_string(),
            turns: request.turns().cloned().collect(),
            tool_names: request
                .tools
                .map(|tools| tools.iter().map(|t| t.name.clone()).collect()),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(BackendError::EmptyResponse))
    }
}

pub fn text(text: &str) -> GenerationResult {
    GenerationResult::Text(text.to_string())
}

pub fn streaming_call(arguments: serde_json::Value) -> GenerationResult {
    GenerationResult::ToolCall(ToolCall {
        id: None,
        name: "find_streaming_platforms".to_string(),
        arguments,
    })
}

/// In-memory catalog with a single entry at most.
#[derive(Default)]
pub struct StubCatalog {
    matches: Vec<MovieMatch>,
    providers: Vec<String>,
    fail_search: bool,
    fail_availability: bool,
    searches: Mutex<Vec<(String, Option<i64>, String)>>,
    availability_lookups: Mutex<Vec<(u64, String)>>,
}

impl StubCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn found(id: u64, title: &str, providers: &[&str]) -> Self {
        Self {
            matches: vec![MovieMatch {
                id,
                title: title.to_string(),
            }],
            providers: providers.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_availability(mut self) -> Self {
        self.fail_availability = true;
        self
    }

    pub fn searches(&self) -> Vec<(String, Option<i64>, String)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn availability_lookups(&self) -> Vec<(u64, String)> {
        self.availability_lookups.lock().unwrap().clone()
    }

    fn unavailable() -> CatalogError {
        CatalogError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn search_movie(&self, query: MovieQuery<'_>) -> Result<Vec<MovieMatch>, CatalogError> {
        self.searches.lock().unwrap().push((
            query.title.to_string(),
            query.year,
            query.language.to_string(),
        ));
        if self.fail_search {
            return Err(Self::unavailable());
        }
        Ok(self.matches.clone())
    }

    async fn flatrate_providers(
        &self,
        movie_id: u64,
        region: &str,
    ) -> Result<Vec<String>, CatalogError> {
        self.availability_lookups
            .lock()
            .unwrap()
            .push((movie_id, region.to_string()));
        if self.fail_availability {
            return Err(Self::unavailable());
        }
        Ok(self.providers.clone())
    }
}
