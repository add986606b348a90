//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub credential_issuer: CredentialIssuerConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Public domain (e.g., "api.example.com")
    pub domain: String,
    /// Protocol ("http" or "https")
    pub protocol: String,
}

impl ServerConfig {
    /// Get the base URL for the service
    ///
    /// # Returns
    /// Full URL like "https://api.example.com"
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.domain)
    }
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Messaging-provider API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API, including port
    /// e.g., "https://api14.unipile.com:14496"
    pub base_url: String,
    /// Public URL the provider calls back after hosted auth completes.
    ///
    /// Defaults to `<server base_url>/unipile-webhook` when unset.
    pub notify_url: Option<String>,
    /// Hosted auth link lifetime in seconds (default: 3600)
    #[serde(default = "default_hosted_auth_expiry_seconds")]
    pub hosted_auth_expiry_seconds: u64,
    /// Outbound request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_hosted_auth_expiry_seconds() -> u64 {
    3600
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl ProviderConfig {
    /// Resolve the webhook notify URL the provider should call.
    pub fn notify_url(&self, server: &ServerConfig) -> String {
        self.notify_url
            .clone()
            .unwrap_or_else(|| format!("{}/unipile-webhook", server.base_url()))
    }
}

/// Credential issuing endpoint configuration
///
/// The provider API key is never shipped in client config; it is
/// fetched once per process from this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialIssuerConfig {
    /// Full URL of the key-issuing endpoint
    /// e.g., "https://project.example.co/functions/v1/get-unipile-key"
    pub url: String,
    /// Application-level bearer token used to authenticate against the issuer
    pub bearer_token: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (LINKREACH_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.protocol", "http")?
            .set_default("provider.hosted_auth_expiry_seconds", 3600)?
            .set_default("provider.request_timeout_seconds", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (LINKREACH_*)
            .add_source(
                Environment::with_prefix("LINKREACH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "provider.base_url must not be empty".to_string(),
            ));
        }

        if url::Url::parse(&self.provider.base_url).is_err() {
            return Err(crate::error::AppError::Config(format!(
                "provider.base_url is not a valid URL: {}",
                self.provider.base_url
            )));
        }

        if url::Url::parse(&self.credential_issuer.url).is_err() {
            return Err(crate::error::AppError::Config(format!(
                "credential_issuer.url is not a valid URL: {}",
                self.credential_issuer.url
            )));
        }

        if self.credential_issuer.bearer_token.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "credential_issuer.bearer_token must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
