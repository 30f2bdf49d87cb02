use std::sync::Arc;

use anyhow::Context;
use holiday_aggregator::{
    logging::init_tracing, server, AbstractApiProvider, FallbackHolidayService, NagerDateProvider,
    ServiceConfig,
};
use tracing::warn;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = ServiceConfig::from_env().context("failed to load service configuration")?;
    if config.primary.api_key.is_empty() {
        warn!("ABSTRACTAPI_KEY is not set, every query will be served by Nager.Date");
    }

    let primary = AbstractApiProvider::new(config.primary.clone())?;
    let secondary = NagerDateProvider::new(config.secondary.clone())?;
    let service = FallbackHolidayService::new(Arc::new(primary), Arc::new(secondary));

    server::start_server(&config.bind_addr, service)
        .await
        .with_context(|| format!("server on {} stopped with an error", config.bind_addr))
}
