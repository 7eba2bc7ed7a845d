//! Runtime settings read from the environment.

use crate::error::ConfigError;
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SCHEMA_PATH: &str = "schemas";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Base URL every entity resource is resolved against.
    pub api_base_url: Url,
    /// Directory holding entity definition files.
    pub schema_path: PathBuf,
    pub bind_addr: String,
    pub body_limit_bytes: usize,
}

impl Settings {
    /// Read `API_BASE_URL`, `SCHEMA_PATH`, `BIND_ADDR` and `BODY_LIMIT_BYTES`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base_url = Url::parse(&api_base)
            .map_err(|e| ConfigError::Load(format!("API_BASE_URL '{}': {}", api_base, e)))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::Load(format!("API_BASE_URL '{}' cannot be a base", api_base)));
        }
        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Load(format!("BODY_LIMIT_BYTES '{}' is not a number", raw)))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };
        Ok(Settings {
            api_base_url,
            schema_path: PathBuf::from(lookup("SCHEMA_PATH").unwrap_or_else(|| DEFAULT_SCHEMA_PATH.into())),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            body_limit_bytes,
        })
    }
}
