use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_EXPIRATION_MINUTES: i64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Process-wide configuration, built once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    token_secret: String,
    pub token_expiration: Duration,
    /// When unset the in-memory document store is used.
    pub database_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_secret", &"<redacted>")
            .field("token_expiration", &self.token_expiration)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl AppConfig {
    /// Configuration with defaults and the given signing secret.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            token_secret: token_secret.into(),
            token_expiration: Duration::minutes(DEFAULT_TOKEN_EXPIRATION_MINUTES),
            database_url: None,
        }
    }

    /// Loads configuration from the environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ACCESS_TOKEN_SECRET".to_string()))?;

        let host = env_or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;

        let port = env_or_default("PORT", &DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let expiration_minutes = env_or_default(
            "TOKEN_EXPIRATION_MINUTES",
            &DEFAULT_TOKEN_EXPIRATION_MINUTES.to_string(),
        )
        .parse::<i64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("TOKEN_EXPIRATION_MINUTES".to_string(), e.to_string())
        })?;
        if expiration_minutes <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TOKEN_EXPIRATION_MINUTES".to_string(),
                "must be positive".to_string(),
            ));
        }

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let config = Self {
            host,
            port,
            token_secret,
            token_expiration: Duration::minutes(expiration_minutes),
            database_url,
        };
        debug!(?config, "Loaded configuration from environment");
        Ok(config)
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = AppConfig::new("secret");
        assert_eq!(config.port, 5000);
        assert_eq!(config.token_secret(), "secret");
        assert_eq!(config.token_expiration, Duration::hours(1));
        assert!(config.database_url.is_none());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::new("super-secret-value").with_database_url("postgres://u:p@h/db");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("postgres://"));
        assert!(rendered.contains("<redacted>"));
    }
}
