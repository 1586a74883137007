use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for ArchMetrics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ArchMetricsConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Generator behaviour: latency, deadlines, inputs and seeds
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Simulated scan latency per generator call (ms). 0 disables the wait.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Upper bound for a single generator or aggregation step (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Source tree handed to the static analyser
    #[serde(default = "default_source_root")]
    pub source_root: String,

    /// Request log export handed to the runtime analyser
    #[serde(default = "default_logs_path")]
    pub logs_path: String,

    /// Version-control history export handed to the evolution analyser
    #[serde(default = "default_history_path")]
    pub history_path: String,

    #[serde(default)]
    pub seeds: SeedConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            timeout_ms: default_timeout_ms(),
            source_root: default_source_root(),
            logs_path: default_logs_path(),
            history_path: default_history_path(),
            seeds: SeedConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Seeds for each pseudo-random source. Same seed, same output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedConfig {
    #[serde(default = "default_static_seed")]
    pub r#static: u64,

    #[serde(default = "default_runtime_seed")]
    pub runtime: u64,

    #[serde(default = "default_evolution_seed")]
    pub evolution: u64,

    #[serde(default = "default_integration_seed")]
    pub integration: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            r#static: default_static_seed(),
            runtime: default_runtime_seed(),
            evolution: default_evolution_seed(),
            integration: default_integration_seed(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

pub const STATIC_SEED: u64 = 42;
pub const RUNTIME_SEED: u64 = 7;
pub const EVOLUTION_SEED: u64 = 99;
pub const INTEGRATION_SEED: u64 = 3;

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_latency_ms() -> u64 {
    50
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_source_root() -> String {
    "./src".to_string()
}
fn default_logs_path() -> String {
    "./data/logs.csv".to_string()
}
fn default_history_path() -> String {
    "./data/git.csv".to_string()
}
fn default_static_seed() -> u64 {
    STATIC_SEED
}
fn default_runtime_seed() -> u64 {
    RUNTIME_SEED
}
fn default_evolution_seed() -> u64 {
    EVOLUTION_SEED
}
fn default_integration_seed() -> u64 {
    INTEGRATION_SEED
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration manager with file lookup and environment overrides
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ArchMetricsConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.archmetrics.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        info!("Loading ArchMetrics configuration");

        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!(path = %path.display(), "Config file loaded"),
            None => info!("No config file found, using defaults"),
        }
        info!(
            host = %config.server.host,
            port = config.server.port,
            latency_ms = config.analysis.latency_ms,
            timeout_ms = config.analysis.timeout_ms,
            "Configuration ready"
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Wrap an already-built configuration, validating it first.
    pub fn from_config(config: ArchMetricsConfig) -> Result<Self, ConfigError> {
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: None,
        })
    }

    /// Load from an explicit TOML file, then apply `.env` and environment
    /// overrides the same way [`ConfigManager::load`] does.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load_dotenv();

        let config = Self::apply_env_overrides(Self::read_toml_file(path)?);
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                info!("Loaded .env file from current directory");
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".archmetrics.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .archmetrics.env: {}", e);
                } else {
                    info!("Loaded .archmetrics.env from home directory");
                }
            }
        }
    }

    /// Search order:
    /// 1. ./.archmetrics.toml
    /// 2. ~/.archmetrics/config.toml
    /// 3. defaults
    fn load_config_file() -> Result<(ArchMetricsConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".archmetrics.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".archmetrics").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((ArchMetricsConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<ArchMetricsConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(mut config: ArchMetricsConfig) -> ArchMetricsConfig {
        if let Ok(host) = std::env::var("ARCHMETRICS_HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_env("ARCHMETRICS_PORT") {
            config.server.port = port;
        }
        if let Some(ms) = parse_env("ARCHMETRICS_LATENCY_MS") {
            config.analysis.latency_ms = ms;
        }
        if let Some(ms) = parse_env("ARCHMETRICS_TIMEOUT_MS") {
            config.analysis.timeout_ms = ms;
        }
        if let Ok(format) = std::env::var("ARCHMETRICS_LOG_FORMAT") {
            config.logging.format = format;
        }

        // Only take RUST_LOG as the level when it is a bare level name;
        // directive strings are handed to the EnvFilter untouched.
        if let Ok(level) = std::env::var("RUST_LOG") {
            if is_log_level(&level) {
                config.logging.level = level;
            }
        }

        config
    }

    fn validate_config(config: &ArchMetricsConfig) -> Result<(), ConfigError> {
        if config.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }

        if config.analysis.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if config.analysis.latency_ms >= config.analysis.timeout_ms {
            return Err(ConfigError::ValidationError(format!(
                "analysis.latency_ms ({}) must be below analysis.timeout_ms ({})",
                config.analysis.latency_ms, config.analysis.timeout_ms
            )));
        }

        if !is_log_level(&config.logging.level) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                config.logging.level
            )));
        }

        match config.logging.format.as_str() {
            "pretty" | "json" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, json, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &ArchMetricsConfig {
        &self.config
    }

    /// Path of the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write the default configuration as TOML
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = ArchMetricsConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|value| parse_override(name, &value))
}

/// Parses an override value, warning and yielding `None` when it is malformed.
fn parse_override<T: FromStr>(name: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(variable = name, value = %value, "Ignoring unparsable override");
            None
        }
    }
}

fn is_log_level(value: &str) -> bool {
    matches!(value, "trace" | "debug" | "info" | "warn" | "error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArchMetricsConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.analysis.latency_ms, 50);
        assert_eq!(config.analysis.source_root, "./src");
        assert_eq!(config.analysis.logs_path, "./data/logs.csv");
        assert_eq!(config.analysis.history_path, "./data/git.csv");
        assert_eq!(config.analysis.seeds.r#static, STATIC_SEED);
        assert_eq!(config.analysis.seeds.integration, INTEGRATION_SEED);
    }

    #[test]
    fn test_config_validation() {
        let config = ArchMetricsConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        let mut bad_level = config.clone();
        bad_level.logging.level = "verbose".to_string();
        assert!(ConfigManager::validate_config(&bad_level).is_err());

        let mut bad_format = config.clone();
        bad_format.logging.format = "xml".to_string();
        assert!(ConfigManager::validate_config(&bad_format).is_err());

        let mut slow = config.clone();
        slow.analysis.latency_ms = slow.analysis.timeout_ms;
        assert!(ConfigManager::validate_config(&slow).is_err());

        let mut zero_timeout = config;
        zero_timeout.analysis.latency_ms = 0;
        zero_timeout.analysis.timeout_ms = 0;
        assert!(ConfigManager::validate_config(&zero_timeout).is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let raw = r#"
            [server]
            port = 8088

            [analysis.seeds]
            evolution = 1234
        "#;
        let config: ArchMetricsConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.analysis.seeds.evolution, 1234);
        assert_eq!(config.analysis.seeds.runtime, RUNTIME_SEED);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn default_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        ConfigManager::create_default_config(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: ArchMetricsConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, ArchMetricsConfig::default());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = ConfigManager::read_toml_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn malformed_numeric_overrides_are_ignored() {
        assert_eq!(parse_override::<u64>("ARCHMETRICS_LATENCY_MS", " 120 "), Some(120));
        assert_eq!(parse_override::<u64>("ARCHMETRICS_LATENCY_MS", "fast"), None);
        assert_eq!(parse_override::<u64>("ARCHMETRICS_TIMEOUT_MS", "-5"), None);
        assert_eq!(parse_override::<u16>("ARCHMETRICS_PORT", "70000"), None);
    }

    #[test]
    fn load_from_path_records_the_file_it_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archmetrics.toml");
        std::fs::write(&path, "[logging]\nformat = \"compact\"\n").unwrap();

        let manager = ConfigManager::load_from_path(&path).unwrap();
        assert_eq!(manager.config_path(), Some(path.as_path()));
        assert_eq!(manager.config().analysis.seeds, SeedConfig::default());
    }

    #[test]
    fn from_config_rejects_invalid_settings() {
        let mut config = ArchMetricsConfig::default();
        config.server.host = "  ".to_string();
        assert!(ConfigManager::from_config(config).is_err());

        let manager = ConfigManager::from_config(ArchMetricsConfig::default()).unwrap();
        assert!(manager.config_path().is_none());
        assert_eq!(manager.config().analysis.timeout(), Duration::from_secs(5));
    }
}
