//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PERKFLOW_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_FRESHNESS_HOURS};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PERKFLOW_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Postgres connection URL. Default: `postgres://localhost:5432/perkflow`.
    pub database_url: String,

    /// Base URL of the OpenAI-compatible embeddings API.
    /// Default: `https://api.openai.com/v1`.
    pub embeddings_url: String,

    /// Embedding model name. Default: `text-embedding-3-small`.
    pub embeddings_model: String,

    /// Bearer token for the embeddings API, if the endpoint requires one.
    pub embeddings_api_key: Option<String>,

    /// Expected embedding vector width. Default: `1536`.
    pub embedding_dim: usize,

    /// Chat model used for categorization and explanation generation.
    /// Default: `gpt-4o-mini`.
    pub llm_model: String,

    /// Qdrant collection holding the question corpus. Default: `perkflow_questions`.
    pub question_collection: String,

    /// Qdrant collection holding the benefit corpus. Default: `perkflow_benefits`.
    pub benefit_collection: String,

    /// Hours a persisted recommendation batch stays fresh. Default: `24`.
    pub freshness_hours: i64,

    /// Comma-separated extra forbidden words appended to the builtin list.
    pub extra_forbidden_words: Vec<String>,
}

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/perkflow";
pub const DEFAULT_EMBEDDINGS_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDINGS_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_QUESTION_COLLECTION: &str = "perkflow_questions";
pub const DEFAULT_BENEFIT_COLLECTION: &str = "perkflow_benefits";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            embeddings_url: DEFAULT_EMBEDDINGS_URL.to_string(),
            embeddings_model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
            embeddings_api_key: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            question_collection: DEFAULT_QUESTION_COLLECTION.to_string(),
            benefit_collection: DEFAULT_BENEFIT_COLLECTION.to_string(),
            freshness_hours: DEFAULT_FRESHNESS_HOURS,
            extra_forbidden_words: Vec::new(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PERKFLOW_PORT";
    const ENV_BIND_ADDR: &'static str = "PERKFLOW_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "PERKFLOW_QDRANT_URL";
    const ENV_DATABASE_URL: &'static str = "PERKFLOW_DATABASE_URL";
    const ENV_EMBEDDINGS_URL: &'static str = "PERKFLOW_EMBEDDINGS_URL";
    const ENV_EMBEDDINGS_MODEL: &'static str = "PERKFLOW_EMBEDDINGS_MODEL";
    const ENV_EMBEDDINGS_API_KEY: &'static str = "PERKFLOW_EMBEDDINGS_API_KEY";
    const ENV_EMBEDDING_DIM: &'static str = "PERKFLOW_EMBEDDING_DIM";
    const ENV_LLM_MODEL: &'static str = "PERKFLOW_LLM_MODEL";
    const ENV_QUESTION_COLLECTION: &'static str = "PERKFLOW_QUESTION_COLLECTION";
    const ENV_BENEFIT_COLLECTION: &'static str = "PERKFLOW_BENEFIT_COLLECTION";
    const ENV_FRESHNESS_HOURS: &'static str = "PERKFLOW_FRESHNESS_HOURS";
    const ENV_FORBIDDEN_WORDS: &'static str = "PERKFLOW_FORBIDDEN_WORDS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let database_url =
            Self::parse_string_from_env(Self::ENV_DATABASE_URL, defaults.database_url);
        let embeddings_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDINGS_URL, defaults.embeddings_url);
        let embeddings_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDINGS_MODEL, defaults.embeddings_model);
        let embeddings_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDINGS_API_KEY);
        let embedding_dim =
            Self::parse_usize_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim);
        let llm_model = Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model);
        let question_collection = Self::parse_string_from_env(
            Self::ENV_QUESTION_COLLECTION,
            defaults.question_collection,
        );
        let benefit_collection =
            Self::parse_string_from_env(Self::ENV_BENEFIT_COLLECTION, defaults.benefit_collection);
        let freshness_hours =
            Self::parse_i64_from_env(Self::ENV_FRESHNESS_HOURS, defaults.freshness_hours);
        let extra_forbidden_words = Self::parse_word_list_from_env(Self::ENV_FORBIDDEN_WORDS);

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            database_url,
            embeddings_url,
            embeddings_model,
            embeddings_api_key,
            embedding_dim,
            llm_model,
            question_collection,
            benefit_collection,
            freshness_hours,
            extra_forbidden_words,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freshness_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "freshness_hours",
                value: self.freshness_hours.to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: "embedding_dim",
                value: self.embedding_dim.to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_i64_from_env(var_name: &str, default: i64) -> i64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_word_list_from_env(var_name: &str) -> Vec<String> {
        env::var(var_name)
            .map(|v| {
                v.split(',')
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
