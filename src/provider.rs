// Provider seam: every upstream holiday API is reached through this trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::holiday::HolidayRecord;

// Error types for provider calls. The display text is user visible when the
// last available provider fails, so keep it readable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    Status { status_code: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    // Maps a reqwest failure onto our taxonomy. Status errors are built by the
    // callers since they have the response at hand.
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_ms)
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Status {
                status_code: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

// Which tier of the fallback chain answered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    Primary,
    Secondary,
}

#[async_trait]
pub trait HolidayProvider: Send + Sync + 'static {
    // Name used in log lines
    fn name(&self) -> &str;

    // Fetch and normalize the public holidays of one country for one year.
    // Neither argument is validated; a bad code is the provider's problem.
    async fn fetch_holidays(
        &self,
        country: &str,
        year: &str,
    ) -> Result<Vec<HolidayRecord>, ProviderError>;
}
