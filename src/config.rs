use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Application configuration, read from a TOML file with environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted `/predict` request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create the `items` and `predictions` tables when they are missing.
    #[serde(default)]
    pub init_schema: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    #[serde(default = "default_features_path")]
    pub features_path: PathBuf,
    /// Keep the first loaded artifacts for the life of the process.
    #[serde(default)]
    pub cache_artifacts: bool,
    #[serde(default = "default_true")]
    pub persist_predictions: bool,
    /// IANA zone used to stamp persisted predictions.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

fn default_database_url() -> String {
    "sqlite://./test.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("linear_regression.json")
}

fn default_features_path() -> PathBuf {
    PathBuf::from("selected_features.csv")
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "America/Lima".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            init_schema: false,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            classifier_path: default_classifier_path(),
            features_path: default_features_path(),
            cache_artifacts: false,
            persist_predictions: true,
            timezone: default_timezone(),
        }
    }
}

impl AppConfig {
    /// Load from `$APP_CONFIG` (default `config.toml`), then apply `HOST`,
    /// `PORT` and `DATABASE_URL` overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.model.time_zone()?;
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be at least 1");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }
}

impl ModelConfig {
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("unknown time zone {:?}: {}", self.timezone, e))
    }
}
