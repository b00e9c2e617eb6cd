use std::{collections::HashMap, net::SocketAddr};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found in env file")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

const KEYS: [&str; 5] = [
    "DATABASE_URL",
    "DATABASE_TIMEOUT",
    "DATABASE_MAX_CONNECTIONS",
    "BIND_ADDRESS",
    "LOG_LEVEL",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    /// Pool acquire timeout, in milliseconds.
    pub database_timeout: u64,
    pub database_max_connections: u32,
    pub bind_address: SocketAddr,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Other variables may hold non-UTF-8 bytes; only these keys are read.
        let vars: HashMap<String, String> = KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .cloned()
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(Self {
            database_url,
            database_timeout: parse_or(vars, "DATABASE_TIMEOUT", 100)?,
            database_max_connections: parse_or(vars, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_address: parse_or(vars, "BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            log_level: vars
                .get("LOG_LEVEL")
                .cloned()
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(
    vars: &HashMap<String, String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
