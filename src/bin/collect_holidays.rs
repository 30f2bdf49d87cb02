use std::sync::Arc;

use anyhow::Context;
use holiday_aggregator::{logging::init_tracing, BatchCollector, CollectorConfig, NagerDateProvider};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = CollectorConfig::from_env().context("failed to load collector configuration")?;
    let provider = NagerDateProvider::new(config.provider.clone())?;
    let collector = BatchCollector::new(Arc::new(provider), config);

    let collection = collector.collect().await;

    // Provider failures were already logged; only writing the files can fail here
    let files = collector
        .persist(&collection.holidays)
        .context("failed to write holiday dataset")?;

    info!(
        rows = collection.summary.rows,
        pairs = collection.summary.pairs_attempted,
        failed_pairs = collection.summary.pairs_failed,
        json = %files.json_path.display(),
        "done"
    );
    Ok(())
}
