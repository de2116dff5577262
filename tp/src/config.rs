//! Tripplanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main tripplanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Vector index configuration
    pub index: IndexConfig,

    /// Places lookup configuration
    pub places: PlacesConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required credentials are present in the environment.
    /// Call this early in startup to fail fast with clear error messages.
    /// The places credential is deliberately not required here: without it
    /// every places lookup degrades to an empty result at request time.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        if std::env::var(&self.index.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Vector index API key not found. Set the {} environment variable.",
                self.index.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplanner.yml
        let local_config = PathBuf::from(".tripplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplanner/tripplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripplanner").join("tripplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 8192,
            temperature: 0.25,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("Environment variable {} is not set", self.api_key_env))
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Environment variable containing the index API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Index environment/region
    pub environment: String,

    /// Index name
    #[serde(rename = "index-name")]
    pub index_name: String,

    /// Explicit index query endpoint; derived from name + environment when unset
    pub host: Option<String>,

    /// Embedding model used for queries
    #[serde(rename = "embed-model")]
    pub embed_model: String,

    /// Number of document excerpts to retrieve
    #[serde(rename = "top-k")]
    pub top_k: usize,

    /// Character budget for the concatenated document context
    #[serde(rename = "context-budget")]
    pub context_budget: usize,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_key_env: "PINECONE_API_KEY".to_string(),
            environment: "us-east-1".to_string(),
            index_name: "travel-guides".to_string(),
            host: None,
            embed_model: "text-embedding-3-small".to_string(),
            top_k: 5,
            context_budget: 4000,
            timeout_ms: 15_000,
        }
    }
}

impl IndexConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("Environment variable {} is not set", self.api_key_env))
    }

    /// Query endpoint for the index
    pub fn query_host(&self) -> String {
        match &self.host {
            Some(host) => host.clone(),
            None => format!("https://{}.svc.{}.pinecone.io", self.index_name, self.environment),
        }
    }
}

/// Places lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Environment variable containing the places API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Places API host
    pub host: String,

    /// Search radius in meters
    #[serde(rename = "radius-m")]
    pub radius_m: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key_env: "RAPIDAPI_KEY".to_string(),
            host: "google-maps-places.p.rapidapi.com".to_string(),
            radius_m: 5000,
            timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.index.index_name, "travel-guides");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_index_query_host_derived() {
        let config = IndexConfig::default();
        assert_eq!(config.query_host(), "https://travel-guides.svc.us-east-1.pinecone.io");

        let config = IndexConfig {
            host: Some("https://example.test".to_string()),
            ..IndexConfig::default()
        };
        assert_eq!(config.query_host(), "https://example.test");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9001

llm:
  model: gpt-4.1
  api-key-env: MY_API_KEY
  base-url: https://api.example.com/v1
  max-tokens: 4096
  temperature: 0.5
  timeout-ms: 60000

index:
  index-name: city-guides
  top-k: 3
  context-budget: 2000

places:
  host: places.example.com
  radius-m: 2500
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.port, 9001);
        assert_eq!(config.llm.model, "gpt-4.1");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.index.index_name, "city-guides");
        assert_eq!(config.index.top_k, 3);
        assert_eq!(config.places.host, "places.example.com");
        assert_eq!(config.places.radius_m, 2500);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gpt-4o
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gpt-4o");

        // Defaults for unspecified
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.index.top_k, 5);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tripplanner.yml");
        fs::write(&path, "server:\n  port: 9100\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9100);

        let missing = dir.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_validate_requires_credentials() {
        let config = Config {
            llm: LlmConfig {
                api_key_env: "TP_TEST_MISSING_LLM_KEY".to_string(),
                ..LlmConfig::default()
            },
            ..Config::default()
        };

        assert!(config.validate().is_err());

        // SAFETY: test runs serially, no concurrent env access
        unsafe { std::env::set_var("TP_TEST_MISSING_LLM_KEY", "k") };
        let config = Config {
            llm: LlmConfig {
                api_key_env: "TP_TEST_MISSING_LLM_KEY".to_string(),
                ..LlmConfig::default()
            },
            index: IndexConfig {
                api_key_env: "TP_TEST_MISSING_INDEX_KEY".to_string(),
                ..IndexConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());

        unsafe { std::env::set_var("TP_TEST_MISSING_INDEX_KEY", "k") };
        assert!(config.validate().is_ok());

        unsafe {
            std::env::remove_var("TP_TEST_MISSING_LLM_KEY");
            std::env::remove_var("TP_TEST_MISSING_INDEX_KEY");
        }
    }
}
