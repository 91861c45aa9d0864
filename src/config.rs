use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub precheck: PrecheckSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    /// Without a key the client runs in deterministic fallback mode.
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            api_key: None,
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            cache_size: default_cache_size(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1024
}

fn default_cache_size() -> u64 {
    1000
}

fn default_cache_ttl() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// Without a key the client runs in deterministic mock mode.
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            api_key: None,
            model: default_generation_model(),
        }
    }
}

fn default_generation_endpoint() -> String {
    "https://api.longcat.chat/openai".to_string()
}

fn default_generation_model() -> String {
    "LongCat-Flash-Thinking".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_hard_weight")]
    pub hard_constraints: f64,
    #[serde(default = "default_soft_weight")]
    pub soft_preferences: f64,
    #[serde(default = "default_historical_weight")]
    pub historical: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            hard_constraints: default_hard_weight(),
            soft_preferences: default_soft_weight(),
            historical: default_historical_weight(),
        }
    }
}

fn default_hard_weight() -> f64 {
    0.4
}
fn default_soft_weight() -> f64 {
    0.4
}
fn default_historical_weight() -> f64 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrecheckSettings {
    #[serde(default = "default_session_capacity")]
    pub session_capacity: u64,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for PrecheckSettings {
    fn default() -> Self {
        Self {
            session_capacity: default_session_capacity(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_capacity() -> u64 {
    10_000
}

fn default_session_ttl() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAWPAL_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. PAWPAL_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PAWPAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_provider_keys(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAWPAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Accept the providers' conventional bare key variables as well as the
/// PAWPAL_-prefixed ones.
fn substitute_provider_keys(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(key) = env::var("EMBEDDING_API_KEY") {
        builder = builder.set_override("embedding.api_key", key)?;
    }
    if let Ok(key) = env::var("GENERATION_API_KEY") {
        builder = builder.set_override("generation.api_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.hard_constraints, 0.4);
        assert_eq!(weights.soft_preferences, 0.4);
        assert_eq!(weights.historical, 0.2);
    }

    #[test]
    fn test_defaults_are_complete() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.embedding.dimension, 1024);
        assert!(settings.embedding.api_key.is_none());
        assert_eq!(settings.precheck.session_ttl_secs, 3600);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
