// Explicit, injectable configuration for both binaries.
//
// Values come from the environment (with `.env` support); anything unset
// falls back to the defaults below. Tests build the structs directly.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub const ABSTRACT_API_URL: &str = "https://holidays.abstractapi.com/v1/";
pub const NAGER_DATE_URL: &str = "https://date.nager.at/api/v3";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

pub const DEFAULT_COUNTRIES: [&str; 10] = ["US", "GB", "CA", "AU", "DE", "FR", "IN", "JP", "BR", "ZA"];
pub const DEFAULT_YEARS: [i32; 3] = [2023, 2024, 2025];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Per-provider HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn abstract_api(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ABSTRACT_API_URL.to_string(),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn nager_date() -> Self {
        Self {
            base_url: NAGER_DATE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    // Shared reqwest client with the per-call timeout baked in
    pub fn build_http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| ConfigError::InitError(format!("failed to build HTTP client: {e}")))
    }
}

// Query service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub primary: ClientConfig,
    pub secondary: ClientConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            primary: ClientConfig::abstract_api(""),
            secondary: ClientConfig::nager_date(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms = parse_or(&lookup, "HOLIDAYS_HTTP_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        let mut primary = ClientConfig::abstract_api(lookup("ABSTRACTAPI_KEY").unwrap_or_default());
        if let Some(url) = lookup("ABSTRACTAPI_BASE_URL") {
            primary.base_url = url;
        }
        primary.timeout_ms = timeout_ms;

        let mut secondary = ClientConfig::nager_date();
        if let Some(url) = lookup("NAGER_BASE_URL") {
            secondary.base_url = url;
        }
        secondary.timeout_ms = timeout_ms;

        Ok(Self {
            bind_addr: lookup("HOLIDAYS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            primary,
            secondary,
        })
    }
}

// Batch collector configuration
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub countries: Vec<String>,
    pub years: Vec<i32>,
    pub request_delay_ms: u64,
    pub output_dir: PathBuf,
    pub json_file: String,
    pub csv_file: String,
    pub provider: ClientConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            years: DEFAULT_YEARS.to_vec(),
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            output_dir: PathBuf::from("."),
            json_file: "holidays_dataset.json".to_string(),
            csv_file: "holidays_dataset.csv".to_string(),
            provider: ClientConfig::nager_date(),
        }
    }
}

impl CollectorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("HOLIDAYS_COUNTRIES") {
            config.countries = split_list(&raw).map(str::to_string).collect();
        }
        if let Some(raw) = lookup("HOLIDAYS_YEARS") {
            config.years = split_list(&raw)
                .map(|y| {
                    y.parse::<i32>().map_err(|_| ConfigError::InvalidValue {
                        key: "HOLIDAYS_YEARS".to_string(),
                        value: raw.clone(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        config.request_delay_ms =
            parse_or(&lookup, "HOLIDAYS_REQUEST_DELAY_MS", DEFAULT_REQUEST_DELAY_MS)?;
        if let Some(dir) = lookup("HOLIDAYS_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("NAGER_BASE_URL") {
            config.provider.base_url = url;
        }
        config.provider.timeout_ms = parse_or(&lookup, "HOLIDAYS_HTTP_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        Ok(config)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
