use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::LiveLinks;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub database: Option<DatabaseSettings>,
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub live_session: LiveSessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which document store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
    Appwrite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            l1_cache_size: default_l1_cache_size(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_l1_cache_size() -> u64 { 1000 }
fn default_ttl_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LiveSessionSettings {
    #[serde(default = "default_youtube_base_url")]
    pub youtube_base_url: String,
    #[serde(default = "default_webrtc_base_url")]
    pub webrtc_base_url: String,
}

impl Default for LiveSessionSettings {
    fn default() -> Self {
        Self {
            youtube_base_url: default_youtube_base_url(),
            webrtc_base_url: default_webrtc_base_url(),
        }
    }
}

impl From<&LiveSessionSettings> for LiveLinks {
    fn from(settings: &LiveSessionSettings) -> Self {
        LiveLinks {
            youtube_base_url: settings.youtube_base_url.clone(),
            webrtc_base_url: settings.webrtc_base_url.clone(),
        }
    }
}

fn default_youtube_base_url() -> String { "https://youtube.com/live".to_string() }
fn default_webrtc_base_url() -> String { "https://webrtc.example/room".to_string() }

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
    /// Load configuration from defaults, files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with KK360__)
    /// 5. Platform variables `PORT`, `DATABASE_URL` and `DATABASE_NAME`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KK360__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = apply_platform_env(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Check that the selected backend has the settings it needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.backend {
            StoreBackend::Postgres if self.database.is_none() => Err(ConfigError::Message(
                "store.backend is postgres but no database.url is configured".to_string(),
            )),
            StoreBackend::Appwrite if self.appwrite.is_none() => Err(ConfigError::Message(
                "store.backend is appwrite but the appwrite section is missing".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000_i64)?
        .set_default("store.backend", "memory")
}

fn environment() -> Environment {
    Environment::with_prefix("KK360")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the variables hosting platforms set without our prefix
fn apply_platform_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let has_appwrite = settings.get_table("appwrite").is_ok();
    let mut builder = Config::builder().add_source(settings);

    if let Some(port) = lookup("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Some(url) = lookup("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Some(name) = lookup("DATABASE_NAME").filter(|_| has_appwrite) {
        builder = builder.set_override("appwrite.database_id", name)?;
    }

    builder.build()
}
