//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// SMTP configuration for outgoing mail (optional).
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance, used when building pagination links.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to sign admin bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
    /// Skip bearer-token verification entirely. Read once at startup;
    /// intended for local development only.
    #[serde(default)]
    pub skip_auth: bool,
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded images.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Directory for uploaded videos.
    #[serde(default = "default_video_dir")]
    pub video_dir: String,
    /// Directory for uploaded documents.
    #[serde(default = "default_document_dir")]
    pub document_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            video_dir: default_video_dir(),
            document_dir: default_document_dir(),
        }
    }
}

/// SMTP configuration for the OTP mail.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outgoing mail.
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_token_expiry() -> u64 {
    3600
}

fn default_upload_dir() -> String {
    "upload".to_string()
}

fn default_video_dir() -> String {
    "video".to_string()
}

fn default_document_dir() -> String {
    "documents".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "campus-cms".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CAMPUS_ENV`)
    /// 3. Environment variables with `CAMPUS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
