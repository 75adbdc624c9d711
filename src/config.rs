//! Process configuration read from the environment (`.env` is loaded by `main`).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://www.alphavantage.co";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub jwt_secret: Vec<u8>,
    /// In-memory store when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub quote_base_url: String,
    pub quote_api_key: String,
    pub quote_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any name -> value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?,
            jwt_secret: jwt_secret.into_bytes(),
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), "5")?,
            quote_base_url: get("QUOTE_BASE_URL").unwrap_or_else(|| DEFAULT_QUOTE_BASE_URL.to_string()),
            quote_api_key: get("QUOTE_API_KEY").unwrap_or_else(|| "demo".to_string()),
            quote_timeout: Duration::from_secs(parse_or(
                "QUOTE_TIMEOUT_SECS",
                get("QUOTE_TIMEOUT_SECS"),
                "10",
            )?),
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::Invalid { name, value })
}
