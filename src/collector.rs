// Batch collector: dumps a country x year grid of holidays to JSON and CSV

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::CollectorConfig,
    holiday::{month_of, HolidayRecord},
    provider::HolidayProvider,
};

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON write error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    CsvError(#[from] csv::Error),
}

// One flat output row. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedHoliday {
    pub date: String,
    pub local_name: String,
    pub name: String,
    pub country_code: String,
    pub fixed: Option<bool>,
    pub global: Option<bool>,
    pub types: String,
    pub year: i32,
    pub month: Option<String>,
}

impl CollectedHoliday {
    // `year` is the year that was asked for, not the one parsed from the date
    pub fn from_record(record: HolidayRecord, year: i32) -> Self {
        let month = month_of(&record.date);
        Self {
            date: record.date,
            local_name: record.name_local,
            name: record.name,
            country_code: record.country,
            fixed: record.fixed,
            global: record.global,
            types: record.holiday_type,
            year,
            month,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub pairs_attempted: usize,
    pub pairs_failed: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub holidays: Vec<CollectedHoliday>,
    pub summary: CollectionSummary,
}

// Where `persist` put things. `csv_path` is None when nothing was collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFiles {
    pub json_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

pub struct BatchCollector {
    provider: Arc<dyn HolidayProvider>,
    config: CollectorConfig,
}

impl BatchCollector {
    pub fn new(provider: Arc<dyn HolidayProvider>, config: CollectorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    // Walks every (year, country) pair, years outermost, one call at a time.
    // A failing pair is logged and contributes nothing; the batch carries on.
    // The configured delay is awaited after every call, success or not.
    pub async fn collect(&self) -> Collection {
        let mut collection = Collection::default();

        info!(
            countries = self.config.countries.len(),
            years = self.config.years.len(),
            provider = self.provider.name(),
            "starting holiday collection"
        );

        for &year in &self.config.years {
            let year_param = year.to_string();
            for country in &self.config.countries {
                info!(%country, year, "fetching holidays");
                collection.summary.pairs_attempted += 1;

                match self.provider.fetch_holidays(country, &year_param).await {
                    Ok(records) => collection.holidays.extend(
                        records
                            .into_iter()
                            .map(|record| CollectedHoliday::from_record(record, year)),
                    ),
                    Err(e) => {
                        collection.summary.pairs_failed += 1;
                        warn!(%country, year, error = %e, "failed to fetch holidays, skipping");
                    }
                }

                tokio::time::sleep(self.config.request_delay()).await;
            }
        }

        collection.summary.rows = collection.holidays.len();
        info!(
            rows = collection.summary.rows,
            failed = collection.summary.pairs_failed,
            "collection finished"
        );
        collection
    }

    // Overwrites both output files. The CSV is skipped for an empty collection.
    pub fn persist(&self, holidays: &[CollectedHoliday]) -> Result<PersistedFiles, CollectorError> {
        fs::create_dir_all(&self.config.output_dir)?;

        let json_path = self.config.json_path();
        let mut json_out = BufWriter::new(File::create(&json_path)?);
        write_json(&mut json_out, holidays)?;
        json_out.flush()?;
        info!(count = holidays.len(), path = %json_path.display(), "saved JSON dataset");

        if holidays.is_empty() {
            info!("no holidays collected, skipping CSV");
            return Ok(PersistedFiles {
                json_path,
                csv_path: None,
            });
        }

        let csv_path = self.config.csv_path();
        write_csv(File::create(&csv_path)?, holidays)?;
        info!(count = holidays.len(), path = %csv_path.display(), "saved CSV dataset");

        Ok(PersistedFiles {
            json_path,
            csv_path: Some(csv_path),
        })
    }
}

// Indented JSON array, four spaces, non-ASCII left as is
pub fn write_json<W: Write>(writer: W, holidays: &[CollectedHoliday]) -> Result<(), CollectorError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    holidays.serialize(&mut ser)?;
    Ok(())
}

// Header comes from the row's field names, written with the first row
pub fn write_csv<W: Write>(writer: W, holidays: &[CollectedHoliday]) -> Result<(), CollectorError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for holiday in holidays {
        wtr.serialize(holiday)?;
    }
    wtr.flush()?;
    Ok(())
}
