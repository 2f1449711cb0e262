use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub encoding: EncodingSettings,
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

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// Where the trained artifacts live, and where to fetch them from when absent
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: PathBuf,
    pub model_url: Option<String>,
    pub scaler_url: Option<String>,
    pub feature_names_url: Option<String>,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
    /// Label column stored alongside the feature names; never encoded
    #[serde(default = "default_target_column")]
    pub target_column: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
            feature_names_path: default_feature_names_path(),
            model_url: None,
            scaler_url: None,
            feature_names_url: None,
            download_timeout_secs: default_download_timeout(),
            target_column: default_target_column(),
        }
    }
}

fn default_model_path() -> PathBuf { PathBuf::from("artifacts/model.json") }
fn default_scaler_path() -> PathBuf { PathBuf::from("artifacts/scaler.json") }
fn default_feature_names_path() -> PathBuf { PathBuf::from("artifacts/feature_names.json") }
fn default_download_timeout() -> u64 { 300 }
fn default_target_column() -> String { "price".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodingSettings {
    /// Reject categorical values the model has no column for instead of
    /// encoding them as the baseline
    #[serde(default)]
    pub reject_unknown_categories: bool,
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

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENT__)
    /// 5. A bare PORT variable, as set by most hosting platforms
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::finish(builder, environment(), std::env::var("PORT").ok())
    }

    /// Load configuration from a custom path
    ///
    /// Environment variables and PORT apply on top, as in [`Settings::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from(path.as_ref()));

        Self::finish(builder, environment(), std::env::var("PORT").ok())
    }

    fn finish(
        builder: ConfigBuilder<DefaultState>,
        env: Environment,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        // e.g., RENT__SERVER__PORT -> server.port
        let mut builder = builder.add_source(env);

        if let Some(raw) = port {
            builder = builder.set_override("server.port", parse_port(&raw)?)?;
        }

        builder.build()?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RENT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// An unusable PORT is a startup error rather than a silent fallback
fn parse_port(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map(i64::from)
        .map_err(|_| ConfigError::Message(format!("PORT must be a port number, got {:?}", raw)))
}
