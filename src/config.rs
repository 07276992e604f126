// src/config.rs

use std::{env, fmt};

use dotenvy::dotenv;

const DEFAULT_JWT_EXPIRATION: u64 = 86_400;
/// Upper bound for `JWT_EXPIRATION`: ten years.
pub const MAX_JWT_EXPIRATION: u64 = 315_360_000;
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// `DATABASE_URL` value that selects the in-process repository.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    /// Admin account created at boot when both are set.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Startup configuration failure.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = match lookup("JWT_EXPIRATION") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if (1..=MAX_JWT_EXPIRATION).contains(&secs) => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "JWT_EXPIRATION",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_JWT_EXPIRATION,
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let raw_origins =
            lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origins: Vec<String> = raw_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        // tower-http refuses `*` inside an origin list.
        if cors_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: raw_origins,
            });
        }

        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            server_port,
            cors_origins,
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}
