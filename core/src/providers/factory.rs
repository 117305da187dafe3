use crate::config::Config;
use crate::error::ConfigError;
use crate::providers::{GeminiProvider, OpenAIProvider};
use crate::traits::Provider;
use std::sync::Arc;

pub fn create_provider(config: &Config, api_key: String) -> Result<Arc<dyn Provider>, ConfigError> {
    let provider_name = config.provider_name();

    match provider_name.to_lowercase().as_str() {
        "gemini" | "google" => {
            let mut provider =
                GeminiProvider::new(api_key).with_generation_config(config.generation);
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        "openai" => {
            let mut provider =
                OpenAIProvider::new(api_key).with_generation_config(config.generation);
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        _ => Err(ConfigError::UnknownProvider(provider_name.to_string())),
    }
}
