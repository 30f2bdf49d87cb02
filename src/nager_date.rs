// Secondary provider: Nager.Date public holidays (free, no key)

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{ClientConfig, ConfigError},
    holiday::{join_types, loose_bool, loose_string, loose_string_list, split_date, HolidayRecord},
    provider::{HolidayProvider, ProviderError},
};

// Wire format of one Nager.Date holiday
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NagerHoliday {
    #[serde(default, deserialize_with = "loose_string")]
    pub date: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub local_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub country_code: String,
    #[serde(default, deserialize_with = "loose_bool")]
    pub fixed: Option<bool>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub global: Option<bool>,
    #[serde(default, deserialize_with = "loose_string_list")]
    pub types: Option<Vec<String>>,
}

impl From<NagerHoliday> for HolidayRecord {
    fn from(h: NagerHoliday) -> Self {
        // Nager.Date has no separate date components
        let (date_year, date_month, date_day) = split_date(&h.date);
        HolidayRecord {
            name: h.name,
            name_local: h.local_name,
            description: String::new(),
            country: h.country_code,
            location: String::new(),
            holiday_type: join_types(h.types.as_deref().unwrap_or_default()),
            date: h.date,
            date_year,
            date_month,
            date_day,
            // Left for the caller; not derived from the date
            week_day: String::new(),
            fixed: h.fixed,
            global: h.global,
        }
    }
}

pub fn normalize(body: &[u8]) -> Result<Vec<HolidayRecord>, ProviderError> {
    let raw: Vec<NagerHoliday> =
        serde_json::from_slice(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(raw.into_iter().map(HolidayRecord::from).collect())
}

pub struct NagerDateProvider {
    http: reqwest::Client,
    config: ClientConfig,
}

impl NagerDateProvider {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: config.build_http_client()?,
            config,
        })
    }

    // Caller input becomes whole path segments, percent-encoded, so a stray
    // `/` or `?` cannot change which resource is requested
    fn url(&self, country: &str, year: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ProviderError::Config(format!("invalid Nager.Date base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config("Nager.Date base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["PublicHolidays", year, country]);
        Ok(url)
    }
}

#[async_trait]
impl HolidayProvider for NagerDateProvider {
    fn name(&self) -> &str {
        "Nager.Date"
    }

    async fn fetch_holidays(
        &self,
        country: &str,
        year: &str,
    ) -> Result<Vec<HolidayRecord>, ProviderError> {
        let timeout_ms = self.config.timeout_ms;
        let response = self
            .http
            .get(self.url(country, year)?)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout_ms))?;

        debug!(%country, %year, status = response.status().as_u16(), "Nager.Date responded");

        // Any non-2xx status is an error here; there is no further tier
        let response = response
            .error_for_status()
            .map_err(|e| ProviderError::from_reqwest(e, timeout_ms))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout_ms))?;
        normalize(&body)
    }
}
