// Fallback-aggregation query handler.
//
// Asks the primary provider first and, on any failure at all, the secondary
// one exactly once. Whichever answers is already normalized by its provider,
// so this layer only decides who answered and how failure is reported.

use std::sync::Arc;

use serde::{ser::SerializeStruct, Serialize, Serializer};
use tracing::{info, warn};

use crate::{
    holiday::HolidayRecord,
    provider::{HolidayProvider, ProviderSource},
};

#[derive(Debug, Clone, PartialEq)]
pub enum HolidayLookup {
    Success {
        holidays: Vec<HolidayRecord>,
        source: ProviderSource,
    },
    Failure {
        error: String,
    },
}

impl HolidayLookup {
    pub fn is_success(&self) -> bool {
        matches!(self, HolidayLookup::Success { .. })
    }
}

// {holidays, success: true, source} | {error, success: false}
impl Serialize for HolidayLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HolidayLookup::Success { holidays, source } => {
                let mut state = serializer.serialize_struct("HolidayLookup", 3)?;
                state.serialize_field("holidays", holidays)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("source", source)?;
                state.end()
            }
            HolidayLookup::Failure { error } => {
                let mut state = serializer.serialize_struct("HolidayLookup", 2)?;
                state.serialize_field("error", error)?;
                state.serialize_field("success", &false)?;
                state.end()
            }
        }
    }
}

#[derive(Clone)]
pub struct FallbackHolidayService {
    primary: Arc<dyn HolidayProvider>,
    secondary: Arc<dyn HolidayProvider>,
}

impl FallbackHolidayService {
    pub fn new(primary: Arc<dyn HolidayProvider>, secondary: Arc<dyn HolidayProvider>) -> Self {
        Self { primary, secondary }
    }

    pub async fn lookup(&self, country: &str, year: &str) -> HolidayLookup {
        match self.primary.fetch_holidays(country, year).await {
            Ok(holidays) => {
                info!(
                    provider = self.primary.name(),
                    %country,
                    %year,
                    count = holidays.len(),
                    "served holidays from primary provider"
                );
                return HolidayLookup::Success {
                    holidays,
                    source: ProviderSource::Primary,
                };
            }
            // Quota exhaustion is expected here and is not a user-facing error
            Err(e) => warn!(
                provider = self.primary.name(),
                fallback = self.secondary.name(),
                error = %e,
                "primary provider failed, falling back"
            ),
        }

        match self.secondary.fetch_holidays(country, year).await {
            Ok(holidays) => {
                info!(
                    provider = self.secondary.name(),
                    %country,
                    %year,
                    count = holidays.len(),
                    "served holidays from secondary provider"
                );
                HolidayLookup::Success {
                    holidays,
                    source: ProviderSource::Secondary,
                }
            }
            Err(e) => {
                warn!(provider = self.secondary.name(), error = %e, "all providers failed");
                HolidayLookup::Failure {
                    error: format!("All API sources failed. Last error: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_api::AbstractApiProvider,
        config::ClientConfig,
        mock_server::{http_stub::StubServer, sample_holiday, MockProvider, ServerMode},
        nager_date::NagerDateProvider,
    };
    use actix_web::{web, HttpResponse};

    fn service(primary: &Arc<MockProvider>, secondary: &Arc<MockProvider>) -> FallbackHolidayService {
        FallbackHolidayService::new(primary.clone(), secondary.clone())
    }

    #[tokio::test]
    async fn test_primary_success_never_calls_secondary() {
        let primary = Arc::new(MockProvider::new("primary"));
        let secondary = Arc::new(MockProvider::new("secondary"));
        primary.add_response("US", "2024", vec![sample_holiday("US", "2024-07-04", "Independence Day")]);

        let result = service(&primary, &secondary).lookup("US", "2024").await;

        match result {
            HolidayLookup::Success { holidays, source } => {
                assert_eq!(source, ProviderSource::Primary);
                assert_eq!(holidays.len(), 1);
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(primary.request_count(), 1);
        assert_eq!(secondary.request_count(), 0);
    }

    #[tokio::test]
    async fn test_primary_empty_list_is_still_success() {
        let primary = Arc::new(MockProvider::new("primary"));
        let secondary = Arc::new(MockProvider::new("secondary"));

        let result = service(&primary, &secondary).lookup("ZZ", "2024").await;

        assert_eq!(
            result,
            HolidayLookup::Success {
                holidays: vec![],
                source: ProviderSource::Primary
            }
        );
        assert_eq!(secondary.request_count(), 0);
    }

    #[tokio::test]
    async fn test_every_primary_failure_falls_back_once() {
        for mode in [
            ServerMode::PaymentRequired,
            ServerMode::ServerError,
            ServerMode::CompleteOutage,
            ServerMode::Malformed,
        ] {
            let primary = Arc::new(MockProvider::with_mode("primary", mode));
            let secondary = Arc::new(MockProvider::new("secondary"));
            secondary.add_response("US", "2024", vec![sample_holiday("US", "2024-12-25", "Christmas Day")]);

            let result = service(&primary, &secondary).lookup("US", "2024").await;

            assert!(
                matches!(
                    result,
                    HolidayLookup::Success { source: ProviderSource::Secondary, .. }
                ),
                "mode {mode:?} did not fall back"
            );
            assert_eq!(secondary.request_count(), 1);
            // Same parameters are forwarded untouched
            assert_eq!(
                secondary.recent_requests(),
                vec![("US".to_string(), "2024".to_string())]
            );
        }
    }

    #[tokio::test]
    async fn test_secondary_records_carry_split_date() {
        let primary = Arc::new(MockProvider::with_mode("primary", ServerMode::PaymentRequired));
        let secondary = Arc::new(MockProvider::new("secondary"));
        secondary.add_response("US", "2024", vec![sample_holiday("US", "2024-11-28", "Thanksgiving Day")]);

        let result = service(&primary, &secondary).lookup("US", "2024").await;

        let HolidayLookup::Success { holidays, .. } = result else {
            panic!("expected success");
        };
        assert_eq!(holidays[0].date_year, "2024");
        assert_eq!(holidays[0].date_month, "11");
        assert_eq!(holidays[0].date_day, "28");
        assert_eq!(holidays[0].week_day, "");
    }

    #[tokio::test]
    async fn test_both_failing_returns_failure() {
        let primary = Arc::new(MockProvider::with_mode("primary", ServerMode::PaymentRequired));
        let secondary = Arc::new(MockProvider::with_mode("secondary", ServerMode::CompleteOutage));

        let result = service(&primary, &secondary).lookup("US", "2024").await;

        match &result {
            HolidayLookup::Failure { error } => {
                assert!(!error.is_empty());
                assert!(error.starts_with("All API sources failed"));
                assert!(error.contains("Service unavailable"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!result.is_success());
        assert_eq!(primary.request_count(), 1);
        assert_eq!(secondary.request_count(), 1);
    }

    #[test]
    fn test_serialized_shapes() {
        let ok = HolidayLookup::Success {
            holidays: vec![],
            source: ProviderSource::Secondary,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "secondary");
        assert!(json["holidays"].as_array().unwrap().is_empty());
        assert!(json.get("error").is_none());

        let failed = HolidayLookup::Failure {
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("holidays").is_none());
    }

    async fn quota_exhausted() -> HttpResponse {
        HttpResponse::PaymentRequired().finish()
    }

    async fn one_nager_holiday() -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!([{
            "date": "2024-07-04",
            "localName": "Independence Day",
            "name": "Independence Day",
            "countryCode": "US",
            "fixed": false,
            "global": true,
            "types": ["Public"]
        }]))
    }

    #[actix_web::test]
    async fn test_quota_exhausted_primary_falls_back_over_http() {
        let stub = StubServer::start(|cfg: &mut web::ServiceConfig| {
            cfg.route("/v1/", web::get().to(quota_exhausted)).route(
                "/api/v3/PublicHolidays/2024/US",
                web::get().to(one_nager_holiday),
            );
        });
        let primary = AbstractApiProvider::new(ClientConfig {
            base_url: format!("{}/v1/", stub.base_url),
            api_key: "test-key".to_string(),
            timeout_ms: 2_000,
        })
        .unwrap();
        let secondary = NagerDateProvider::new(ClientConfig {
            base_url: format!("{}/api/v3", stub.base_url),
            api_key: String::new(),
            timeout_ms: 2_000,
        })
        .unwrap();
        let service = FallbackHolidayService::new(Arc::new(primary), Arc::new(secondary));

        let result = service.lookup("US", "2024").await;

        match result {
            HolidayLookup::Success { holidays, source } => {
                assert_eq!(source, ProviderSource::Secondary);
                assert_eq!(holidays.len(), 1);
                assert_eq!(holidays[0].date_month, "07");
                assert_eq!(holidays[0].week_day, "");
                assert_eq!(holidays[0].global, Some(true));
            }
            other => panic!("expected success, got {other:?}"),
        }
        stub.stop().await;
    }
}
