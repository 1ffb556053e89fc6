//! Configuration, loaded from environment variables once at startup and
//! handed to the components that need it. No process-wide state.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// HS256 secret the external login service signs bearer tokens with.
    pub jwt_secret: String,
    /// Optional event bus; order events are dropped when unset.
    pub nats_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingRequired("DATABASE_URL"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8083".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT"))?,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::MissingRequired("JWT_SECRET"))?,
            nats_url: env::var("NATS_URL").ok(),
        })
    }
}
