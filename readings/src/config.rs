use crate::store::mongo::DEFAULT_COLLECTION;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MAX_LIMIT: u32 = 1000;

/// Process configuration, read from the environment.
///
/// A missing `MONGODB_URI` is not a startup error: requests that need the
/// store fail with a configuration error instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mongodb_uri: Option<String>,
    pub mongodb_database: Option<String>,
    pub mongodb_collection: String,
    pub host: String,
    pub port: u16,
    pub max_limit: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_limit = match parse_or(&lookup, "READINGS_MAX_LIMIT", DEFAULT_MAX_LIMIT) {
            0 => {
                warn!("READINGS_MAX_LIMIT must be positive, using {}", DEFAULT_MAX_LIMIT);
                DEFAULT_MAX_LIMIT
            }
            limit => limit,
        };

        Self {
            mongodb_uri: non_empty("MONGODB_URI"),
            mongodb_database: non_empty("MONGODB_DATABASE"),
            mongodb_collection: non_empty("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            max_limit,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        None => default,
    }
}
