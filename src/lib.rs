// Main library file for the holiday aggregator

// Query path: providers behind one trait, primary with fallback
pub mod abstract_api;
pub mod fallback;
pub mod holiday;
pub mod nager_date;
pub mod provider;
pub mod server;

// Offline dump of a country x year grid
pub mod collector;

pub mod config;
pub mod logging;
pub mod mock_server;

// Re-export key types for convenience
pub use abstract_api::AbstractApiProvider;
pub use collector::{BatchCollector, CollectedHoliday, Collection, CollectionSummary, CollectorError};
pub use config::{ClientConfig, CollectorConfig, ConfigError, ServiceConfig};
pub use fallback::{FallbackHolidayService, HolidayLookup};
pub use holiday::HolidayRecord;
pub use nager_date::NagerDateProvider;
pub use provider::{HolidayProvider, ProviderError, ProviderSource};
