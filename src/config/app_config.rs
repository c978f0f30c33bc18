use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Persistence backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    /// Connection URL; `DATABASE_URL` is used when unset
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Argon2 cost parameters, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Window size used when a caller does not ask for one
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            max_connections: 10,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` variables
    ///
    /// Missing sources and keys fall back to defaults. A value that is present
    /// but malformed is an error.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(app_environment())
    }

    fn load_with_env(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, "memory");
        assert!(config.storage.url.is_none());
        assert_eq!(config.hashing.memory_kib, 19 * 1024);
        assert_eq!(config.hashing.iterations, 2);
        assert_eq!(config.hashing.parallelism, 1);
        assert_eq!(config.feed.default_limit, 10);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"storage": {"backend": "postgres", "url": "postgres://localhost/board"}}"#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, "postgres");
        assert_eq!(config.storage.max_connections, 10);
        assert_eq!(config.server.port, 8080);
        assert!(matches!(config.logging.format, LogFormat::Pretty));
    }

    fn load_from_vars(vars: &[(&str, &str)]) -> Result<AppConfig, config::ConfigError> {
        let source = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<config::Map<String, String>>();

        AppConfig::load_with_env(app_environment().source(Some(source)))
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let config = load_from_vars(&[]).unwrap();

        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.hashing.iterations, 2);
    }

    #[test]
    fn test_single_hashing_override_keeps_other_settings() {
        let config = load_from_vars(&[
            ("APP__STORAGE__BACKEND", "postgres"),
            ("APP__STORAGE__URL", "postgres://localhost/board"),
            ("APP__HASHING__ITERATIONS", "3"),
        ])
        .unwrap();

        assert_eq!(config.storage.backend, "postgres");
        assert_eq!(config.storage.url.as_deref(), Some("postgres://localhost/board"));
        assert_eq!(config.hashing.iterations, 3);
        assert_eq!(config.hashing.memory_kib, 19 * 1024);
        assert_eq!(config.hashing.parallelism, 1);
    }

    #[test]
    fn test_partial_server_and_feed_sections() {
        let config = load_from_vars(&[
            ("APP__SERVER__PORT", "9090"),
            ("APP__FEED__DEFAULT_LIMIT", "25"),
            ("APP__LOGGING__FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.feed.default_limit, 25);
        assert_eq!(config.logging.level, "info");
        assert!(matches!(config.logging.format, LogFormat::Json));
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result = load_from_vars(&[("APP__HASHING__MEMORY_KIB", "abc")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert!(matches!(format, LogFormat::Json));
    }
}
