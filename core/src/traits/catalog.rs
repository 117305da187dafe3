use crate::error::CatalogError;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Copy)]
pub struct MovieQuery<'a> {
    pub title: &'a str,
    pub year: Option<i64>,
    pub language: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieMatch {
    pub id: u64,
    pub title: String,
}

/// Read-only movie catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Matches ordered by relevance, best first.
    async fn search_movie(&self, query: MovieQuery<'_>) -> Result<Vec<MovieMatch>, CatalogError>;

    /// Names of the subscription ("flatrate") offers for `movie_id` in
    /// `region`, in catalog order.
    async fn flatrate_providers(
        &self,
        movie_id: u64,
        region: &str,
    ) -> Result<Vec<String>, CatalogError>;
}
