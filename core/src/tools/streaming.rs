use crate::error::CatalogError;
use crate::tools::loose_integer_opt;
use crate::traits::{Catalog, MovieQuery, Tool, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_LANGUAGE: &str = "pt-BR";
pub const DEFAULT_REGION: &str = "BR";
pub const DEFAULT_REGION_NAME: &str = "Brasil";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindStreamingPlatformsArgs {
    #[schemars(description = "Título do filme")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_integer_opt")]
    #[schemars(with = "Option<i64>", description = "Ano de lançamento, se conhecido")]
    pub year: Option<i64>,
}

pub struct FindStreamingPlatformsTool {
    catalog: Arc<dyn Catalog>,
    language: String,
    region: String,
    region_name: String,
}

impl FindStreamingPlatformsTool {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            language: DEFAULT_LANGUAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            region_name: DEFAULT_REGION_NAME.to_string(),
        }
    }

    pub fn with_locale(
        mut self,
        language: impl Into<String>,
        region: impl Into<String>,
        region_name: impl Into<String>,
    ) -> Self {
        self.language = language.into();
        self.region = region.into();
        self.region_name = region_name.into();
        self
    }

    /// Looks the title up and phrases the outcome for the backend.
    pub async fn find(&self, title: &str, year: Option<i64>) -> String {
        match self.lookup(title, year).await {
            Ok(sentence) => sentence,
            Err(e) => {
                warn!(title, ?year, error = %e, "Streaming lookup failed");
                format!("Ocorreu um erro ao buscar por '{title}'.")
            }
        }
    }

    async fn lookup(&self, title: &str, year: Option<i64>) -> Result<String, CatalogError> {
        let query = MovieQuery {
            title,
            year,
            language: &self.language,
        };
        let matches = self.catalog.search_movie(query).await?;

        let Some(best) = matches.first() else {
            info!(title, ?year, "No catalog match");
            return Ok(match year {
                Some(year) => {
                    format!("Não foram encontrados resultados para '{title}' (Ano: {year}).")
                }
                None => format!("Não foram encontrados resultados para '{title}'."),
            });
        };

        let providers = self
            .catalog
            .flatrate_providers(best.id, &self.region)
            .await?;
        info!(
            title,
            found = %best.title,
            id = best.id,
            providers = providers.len(),
            "Catalog lookup finished"
        );

        if providers.is_empty() {
            return Ok(format!(
                "O filme '{}' não parece estar disponível em nenhuma plataforma de streaming no {} no momento.",
                best.title, self.region_name
            ));
        }

        Ok(format!(
            "Encontrei '{}' nas seguintes plataformas de streaming no {}: {}.",
            best.title,
            self.region_name,
            providers.join(", ")
        ))
    }
}

#[async_trait]
impl Tool for FindStreamingPlatformsTool {
    type Args = FindStreamingPlatformsArgs;

    fn name(&self) -> &str {
        "find_streaming_platforms"
    }

    fn description(&self) -> &str {
        "Descobre em quais plataformas de streaming por assinatura um filme está disponível. \
         Use quando o usuário perguntar onde assistir a um filme específico."
    }

    async fn execute(&self, args: FindStreamingPlatformsArgs) -> anyhow::Result<ToolResult> {
        Ok(ToolResult::new(self.find(&args.title, args.year).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubCatalog;
    use serde_json::json;

    fn tool(catalog: &Arc<StubCatalog>) -> FindStreamingPlatformsTool {
        FindStreamingPlatformsTool::new(catalog.clone())
    }

    fn args(value: serde_json::Value) -> FindStreamingPlatformsArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn schema_declares_title_and_optional_year() {
        let catalog = Arc::new(StubCatalog::empty());
        let schema = tool(&catalog).parameters_schema();

        assert_eq!(schema["required"], json!(["title"]));
        assert_eq!(schema["properties"]["title"]["type"], "string");
        assert_eq!(schema["properties"]["year"]["type"], "integer");
        assert_eq!(
            schema["properties"]["year"]["description"],
            "Ano de lançamento, se conhecido"
        );
    }

    #[test]
    fn year_accepts_loose_encodings() {
        assert_eq!(args(json!({ "title": "Duna", "year": 2021.0 })).year, Some(2021));
        assert_eq!(args(json!({ "title": "Duna", "year": "2021" })).year, Some(2021));
        assert_eq!(args(json!({ "title": "Duna" })).year, None);
        assert!(
            serde_json::from_value::<FindStreamingPlatformsArgs>(json!({ "year": 2021 })).is_err()
        );
    }

    #[tokio::test]
    async fn lists_flatrate_platforms_with_catalog_title() {
        let catalog = Arc::new(StubCatalog::found(27205, "Inception", &["Netflix", "HBO Max"]));

        let result = tool(&catalog)
            .execute(args(json!({ "title": "A Origem", "year": 2010 })))
            .await
            .unwrap();

        assert_eq!(
            result.result,
            "Encontrei 'Inception' nas seguintes plataformas de streaming no Brasil: Netflix, HBO Max."
        );
        let searches = catalog.searches();
        assert_eq!(searches, vec![("A Origem".to_string(), Some(2010), "pt-BR".to_string())]);
        assert_eq!(catalog.availability_lookups(), vec![(27205, "BR".to_string())]);
    }

    #[tokio::test]
    async fn no_match_skips_availability_lookup() {
        let catalog = Arc::new(StubCatalog::empty());

        let result = tool(&catalog)
            .execute(args(json!({ "title": "Filme Inexistente", "year": 1999 })))
            .await
            .unwrap();

        assert_eq!(
            result.result,
            "Não foram encontrados resultados para 'Filme Inexistente' (Ano: 1999)."
        );
        assert!(catalog.availability_lookups().is_empty());
    }

    #[tokio::test]
    async fn no_match_without_year() {
        let catalog = Arc::new(StubCatalog::empty());
        let result = tool(&catalog).find("Filme Inexistente", None).await;
        assert_eq!(result, "Não foram encontrados resultados para 'Filme Inexistente'.");
    }

    #[tokio::test]
    async fn no_flatrate_offer() {
        let catalog = Arc::new(StubCatalog::found(11, "Star Wars", &[]));

        let result = tool(&catalog).find("Guerra nas Estrelas", Some(1977)).await;

        assert_eq!(
            result,
            "O filme 'Star Wars' não parece estar disponível em nenhuma plataforma de streaming no Brasil no momento."
        );
    }

    #[tokio::test]
    async fn search_failure_becomes_error_sentence() {
        let catalog = Arc::new(StubCatalog::empty().failing_search());
        let result = tool(&catalog).find("Duna", None).await;
        assert_eq!(result, "Ocorreu um erro ao buscar por 'Duna'.");
    }

    #[tokio::test]
    async fn availability_failure_becomes_error_sentence() {
        let catalog =
            Arc::new(StubCatalog::found(438631, "Duna", &["Max"]).failing_availability());
        let result = tool(&catalog).find("Duna", Some(2021)).await;
        assert_eq!(result, "Ocorreu um erro ao buscar por 'Duna'.");
    }

    #[tokio::test]
    async fn same_call_same_result() {
        let catalog = Arc::new(StubCatalog::found(27205, "Inception", &["Netflix"]));
        let tool = tool(&catalog);
        let call = args(json!({ "title": "A Origem", "year": 2010 }));

        let first = tool.execute(call.clone()).await.unwrap();
        let second = tool.execute(call).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn region_name_is_configurable() {
        let catalog = Arc::new(StubCatalog::found(1, "Inception", &["Netflix"]));
        let tool = FindStreamingPlatformsTool::new(catalog.clone()).with_locale("pt-PT", "PT", "Portugal");

        let result = tool.find("A Origem", None).await;

        assert_eq!(
            result,
            "Encontrei 'Inception' nas seguintes plataformas de streaming no Portugal: Netflix."
        );
        assert_eq!(catalog.availability_lookups(), vec![(1, "PT".to_string())]);
    }
}
