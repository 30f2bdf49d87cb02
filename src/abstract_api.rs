// Primary provider: AbstractAPI Holidays (keyed, quota limited)

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{ClientConfig, ConfigError},
    holiday::{loose_string, HolidayRecord},
    provider::{HolidayProvider, ProviderError},
};

// Wire format of one AbstractAPI holiday
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbstractHoliday {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub name_local: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub country: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub location: String,
    #[serde(rename = "type", default, deserialize_with = "loose_string")]
    pub holiday_type: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub date_year: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub date_month: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub date_day: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub week_day: String,
}

impl From<AbstractHoliday> for HolidayRecord {
    fn from(h: AbstractHoliday) -> Self {
        HolidayRecord {
            name: h.name,
            name_local: h.name_local,
            description: h.description,
            country: h.country,
            location: h.location,
            holiday_type: h.holiday_type,
            date: h.date,
            date_year: h.date_year,
            date_month: h.date_month,
            date_day: h.date_day,
            week_day: h.week_day,
            fixed: None,
            global: None,
        }
    }
}

pub fn normalize(body: &[u8]) -> Result<Vec<HolidayRecord>, ProviderError> {
    let raw: Vec<AbstractHoliday> =
        serde_json::from_slice(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(raw.into_iter().map(HolidayRecord::from).collect())
}

pub struct AbstractApiProvider {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AbstractApiProvider {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: config.build_http_client()?,
            config,
        })
    }
}

#[async_trait]
impl HolidayProvider for AbstractApiProvider {
    fn name(&self) -> &str {
        "AbstractAPI"
    }

    async fn fetch_holidays(
        &self,
        country: &str,
        year: &str,
    ) -> Result<Vec<HolidayRecord>, ProviderError> {
        // Without a key the call can only fail, so skip straight to the fallback
        if self.config.api_key.is_empty() {
            return Err(ProviderError::Config("AbstractAPI key is not set".to_string()));
        }

        let timeout_ms = self.config.timeout_ms;
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("country", country),
                ("year", year),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout_ms))?;

        let status = response.status();
        debug!(%country, %year, status = status.as_u16(), "AbstractAPI responded");

        // Only a plain 200 counts; 402 (quota exhausted) and friends fall back
        if status != reqwest::StatusCode::OK {
            return Err(ProviderError::Status {
                status_code: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout_ms))?;
        normalize(&body)
    }
}
