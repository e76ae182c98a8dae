//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. `DATABASE_URL` for the database url
//! 2. Environment variables (prefixed with SURVEYOR_, `__` between levels)
//! 3. Config file (config.toml)
//! 4. Default values
//!
//! The token signing secret belongs in the environment
//! (`SURVEYOR_AUTH__JWT_SECRET`), not in the config file.

use config::{Config, ConfigError, Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Secret used when none is configured. Fine for local development only.
pub const DEVELOPMENT_JWT_SECRET: &str = "surveyor-development-secret";

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection url, e.g. `postgres://...`, `mysql://...` or `sqlite://...`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://surveyor.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens (should be in env var SURVEYOR_AUTH__JWT_SECRET)
    pub jwt_secret: String,
    /// Token lifetime in hours (default: 7 days)
    pub token_ttl_hours: u32,
    /// Minimum password length on registration
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_ttl_hours: 168,
            min_password_length: 6,
        }
    }
}

impl AuthConfig {
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g., SURVEYOR_SERVER__PORT, SURVEYOR_AUTH__JWT_SECRET
            .add_source(
                Environment::with_prefix("SURVEYOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = config.try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database.url = url;
            }
        }

        Ok(config)
    }
}

/// Initialize application configuration
///
/// This triggers the lazy loading of the config file and logs the result.
/// Should be called early in application startup.
pub fn init() {
    let config = get_config();
    log::info!(
        "Configuration loaded: listening on {}:{}",
        config.server.host,
        config.server.port
    );
    if config.auth.uses_development_secret() {
        log::warn!("SURVEYOR_AUTH__JWT_SECRET is not set. Tokens are signed with the development secret and must not be trusted in production.");
    }
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}
