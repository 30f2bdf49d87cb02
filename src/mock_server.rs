// In-process mock provider for tests and benchmarks.
//
// Behaves like an upstream holiday API whose failure mode can be switched at
// runtime, and records every call it receives.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU8, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    holiday::HolidayRecord,
    provider::{HolidayProvider, ProviderError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Normal,
    // 402, what a quota-limited API answers once the plan runs out
    PaymentRequired,
    ServerError,
    CompleteOutage,
    // 200 with a body that is not a holiday list
    Malformed,
}

impl ServerMode {
    fn to_u8(self) -> u8 {
        match self {
            ServerMode::Normal => 0,
            ServerMode::PaymentRequired => 1,
            ServerMode::ServerError => 2,
            ServerMode::CompleteOutage => 3,
            ServerMode::Malformed => 4,
        }
    }
}

pub struct MockProvider {
    name: String,
    mode: AtomicU8,
    request_count: AtomicUsize,
    fail_next_requests: AtomicUsize,
    responses: Mutex<HashMap<(String, String), Vec<HolidayRecord>>>,
    recent_requests: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: AtomicU8::new(0), // Normal mode
            request_count: AtomicUsize::new(0),
            fail_next_requests: AtomicUsize::new(0),
            responses: Mutex::new(HashMap::new()),
            recent_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_mode(name: &str, mode: ServerMode) -> Self {
        let provider = Self::new(name);
        provider.set_mode(mode);
        provider
    }

    pub fn set_mode(&self, mode: ServerMode) {
        self.mode.store(mode.to_u8(), Ordering::SeqCst);
    }

    // The next `count` calls answer 500 regardless of mode
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next_requests.store(count, Ordering::SeqCst);
    }

    pub fn add_response(&self, country: &str, year: &str, holidays: Vec<HolidayRecord>) {
        self.responses
            .lock()
            .insert((country.to_string(), year.to_string()), holidays);
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn recent_requests(&self) -> Vec<(String, String)> {
        self.recent_requests.lock().clone()
    }
}

#[async_trait]
impl HolidayProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_holidays(
        &self,
        country: &str,
        year: &str,
    ) -> Result<Vec<HolidayRecord>, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.recent_requests
            .lock()
            .push((country.to_string(), year.to_string()));

        let fail_count = self.fail_next_requests.load(Ordering::SeqCst);
        if fail_count > 0 {
            self.fail_next_requests
                .store(fail_count - 1, Ordering::SeqCst);
            return Err(ProviderError::Status {
                status_code: 500,
                message: "Internal Server Error".to_string(),
            });
        }

        match self.mode.load(Ordering::SeqCst) {
            1 => {
                return Err(ProviderError::Status {
                    status_code: 402,
                    message: "Payment Required".to_string(),
                })
            }
            2 => {
                return Err(ProviderError::Status {
                    status_code: 500,
                    message: "Internal Server Error".to_string(),
                })
            }
            3 => return Err(ProviderError::Network("Service unavailable".to_string())),
            4 => {
                return Err(ProviderError::Decode(
                    "invalid type: map, expected a sequence".to_string(),
                ))
            }
            _ => {}
        }

        // Unknown (country, year) pairs answer with an empty list
        Ok(self
            .responses
            .lock()
            .get(&(country.to_string(), year.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

// Small record builder so tests don't spell out every field
pub fn sample_holiday(country: &str, date: &str, name: &str) -> HolidayRecord {
    let (date_year, date_month, date_day) = crate::holiday::split_date(date);
    HolidayRecord {
        name: name.to_string(),
        name_local: name.to_string(),
        country: country.to_string(),
        holiday_type: "Public".to_string(),
        date: date.to_string(),
        date_year,
        date_month,
        date_day,
        fixed: Some(true),
        global: Some(true),
        ..Default::default()
    }
}

// Real HTTP endpoint on an ephemeral port, for exercising the reqwest
// providers end to end. Routes are supplied per test.
#[cfg(test)]
pub(crate) mod http_stub {
    use actix_web::{dev::ServerHandle, web, App, HttpServer};

    pub struct StubServer {
        pub base_url: String,
        handle: ServerHandle,
    }

    impl StubServer {
        pub fn start<F>(routes: F) -> Self
        where
            F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
        {
            let server = HttpServer::new(move || App::new().configure(routes.clone()))
                .workers(1)
                .bind(("127.0.0.1", 0))
                .unwrap();
            let addr = server.addrs()[0];
            let server = server.run();
            let handle = server.handle();
            actix_web::rt::spawn(server);

            Self {
                base_url: format!("http://{addr}"),
                handle,
            }
        }

        pub async fn stop(self) {
            self.handle.stop(false).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_and_records_calls() {
        let server = MockProvider::new("mock");
        server.add_response("US", "2024", vec![sample_holiday("US", "2024-01-01", "New Year's Day")]);

        let hit = server.fetch_holidays("US", "2024").await.unwrap();
        let miss = server.fetch_holidays("ZZ", "2024").await.unwrap();

        assert_eq!(hit.len(), 1);
        assert!(miss.is_empty());
        assert_eq!(server.request_count(), 2);
        assert_eq!(
            server.recent_requests(),
            vec![
                ("US".to_string(), "2024".to_string()),
                ("ZZ".to_string(), "2024".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_modes() {
        let server = MockProvider::with_mode("mock", ServerMode::PaymentRequired);
        assert!(matches!(
            server.fetch_holidays("US", "2024").await,
            Err(ProviderError::Status { status_code: 402, .. })
        ));

        server.set_mode(ServerMode::CompleteOutage);
        assert!(matches!(
            server.fetch_holidays("US", "2024").await,
            Err(ProviderError::Network(_))
        ));

        server.set_mode(ServerMode::Normal);
        server.fail_next_requests(1);
        assert!(server.fetch_holidays("US", "2024").await.is_err());
        assert!(server.fetch_holidays("US", "2024").await.is_ok());
    }
}
