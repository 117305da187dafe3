use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILMEBOT_DIR: &str = ".filmebot";

pub const GEMINI_KEY_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];
pub const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY"];
pub const TMDB_KEY_VARS: &[&str] = &["TMDB_API_KEY"];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Recommends movies and looks up where to stream them.
    #[default]
    MovieGuide,
    /// Plain conversation, no tools.
    HistoryTeacher,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub language: String,
    pub region: String,
    pub region_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            timeout_secs: 10,
            language: "pt-BR".to_string(),
            region: "BR".to_string(),
            region_name: "Brasil".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub persona: Persona,
    pub max_tool_calls: usize,
    pub generation: GenerationConfig,
    pub catalog: CatalogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: None,
            persona: Persona::default(),
            max_tool_calls: crate::agent::loop_::DEFAULT_MAX_TOOL_CALLS,
            generation: GenerationConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

pub fn get_filmebot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(FILMEBOT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_filmebot_dir().join("config.toml")
}

impl Config {
    /// Loads `path`, or the default config file when no path is given.
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_config(path),
            None => {
                let path = get_config_path();
                if path.exists() {
                    load_config(&path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().unwrap_or("gemini")
    }

    /// The backend credential, environment first, then the config file.
    pub fn backend_api_key(&self) -> Result<String, ConfigError> {
        self.backend_api_key_with(|var| std::env::var(var).ok())
    }

    pub fn catalog_api_key(&self) -> Result<String, ConfigError> {
        self.catalog_api_key_with(|var| std::env::var(var).ok())
    }

    pub fn backend_api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        let (provider, vars) = match self.provider_name().to_lowercase().as_str() {
            "gemini" | "google" => ("gemini", GEMINI_KEY_VARS),
            "openai" => ("openai", OPENAI_KEY_VARS),
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        };
        resolve_api_key_with_fallback(&lookup, provider, vars, &self.api_key)
    }

    pub fn catalog_api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        resolve_api_key_with_fallback(&lookup, "tmdb", TMDB_KEY_VARS, &self.catalog.api_key)
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_api_key_with_fallback(
    lookup: &impl Fn(&str) -> Option<String>,
    provider: &'static str,
    env_vars: &'static [&'static str],
    config_key: &str,
) -> Result<String, ConfigError> {
    for &var_name in env_vars {
        if let Some(key) = lookup(var_name).filter(|k| !k.trim().is_empty()) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(ConfigError::MissingCredential {
            provider,
            vars: env_vars,
        })
    }
}
