use crate::error::CatalogError;
use crate::traits::{Catalog, MovieMatch, MovieQuery};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieMatch>,
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, RegionOffers>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionOffers {
    #[serde(default)]
    flatrate: Vec<ProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    provider_name: String,
}

/// The Movie Database (TMDB) v3 API.
pub struct TmdbCatalog {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://api.themoviedb.org/3".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "Catalog response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Catalog for TmdbCatalog {
    async fn search_movie(&self, query: MovieQuery<'_>) -> Result<Vec<MovieMatch>, CatalogError> {
        let mut params = vec![
            ("query", query.title.to_string()),
            ("language", query.language.to_string()),
        ];
        if let Some(year) = query.year {
            params.push(("year", year.to_string()));
        }

        let response: SearchResponse = self.get_json("/search/movie", &params).await?;
        Ok(response.results)
    }

    async fn flatrate_providers(
        &self,
        movie_id: u64,
        region: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let response: WatchProvidersResponse = self
            .get_json(&format!("/movie/{movie_id}/watch/providers"), &[])
            .await?;
        Ok(flatrate_names(response, region))
    }
}

fn flatrate_names(mut response: WatchProvidersResponse, region: &str) -> Vec<String> {
    response
        .results
        .remove(region)
        .unwrap_or_default()
        .flatrate
        .into_iter()
        .map(|p| p.provider_name)
        .collect()
}
