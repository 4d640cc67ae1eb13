//! Server configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_GENERATION_DELAY_MS: u64 = 800;
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("BASE_PATH must start with '/', got {0:?}")]
    InvalidBasePath(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for every route, empty or starting with '/' and without a trailing one.
    pub base_path: String,
    pub static_dir: PathBuf,
    pub generation_delay: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: String::new(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            generation_delay: Duration::from_millis(DEFAULT_GENERATION_DELAY_MS),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => defaults.port,
        };
        let generation_delay = match var("GENERATION_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_number("GENERATION_DELAY_MS", &raw)?),
            None => defaults.generation_delay,
        };
        let base_path = match var("BASE_PATH") {
            Some(raw) => normalize_base_path(&raw)?,
            None => defaults.base_path,
        };
        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            base_path,
            static_dir: var("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            generation_delay,
            allowed_origins,
        })
    }

    /// `path` under the configured base path.
    pub fn route(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidBasePath(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
