use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::model::{COLUMNS, DeliveryDataset, DeliveryRecord};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the delivery dataset from a CSV file.
///
/// Expected layout: UTF-8, comma separated, one header row naming at least
/// the columns in [`COLUMNS`] (any order, extra columns ignored):
///
/// ```text
/// restaurant,cuisine_type,weather_condition,rating,delivery_time_mins,distance_km,latitude,longitude
/// Spice Route,Indian,Sunny,4.5,25,3.0,12.97,77.59
/// ```
///
/// A single bad row fails the whole load; nothing is skipped.
pub fn load_file(path: &Path) -> Result<DeliveryDataset> {
    let file = File::open(path).map_err(|e| unavailable(path, format!("opening file: {e}")))?;
    read_records(file, path)
}

/// Load the dataset from any reader, e.g. an in-memory export.
#[cfg(test)]
pub fn load_reader<R: Read>(reader: R) -> Result<DeliveryDataset> {
    read_records(reader, Path::new("<memory>"))
}

// ---------------------------------------------------------------------------
// Process-wide cache
// ---------------------------------------------------------------------------

/// Holds the dataset once it has been parsed.
///
/// The first successful [`get_or_load`](Self::get_or_load) parses the file;
/// every later call returns the same `Arc` without touching the source, even
/// if a different path is passed. The lock is held while parsing so that
/// concurrent first callers never parse twice.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slot: Mutex<Option<Arc<DeliveryDataset>>>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<DeliveryDataset>> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(path)?);
        log::info!(
            "Loaded {} delivery records from {} ({} cuisines, {} weather conditions)",
            dataset.len(),
            path.display(),
            dataset.cuisines.len(),
            dataset.weather_conditions.len()
        );
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
}

static SHARED: DatasetCache = DatasetCache::new();

/// Load through the process-wide cache.
pub fn load_shared(path: &Path) -> Result<Arc<DeliveryDataset>> {
    SHARED.get_or_load(path)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

fn read_records<R: Read>(reader: R, source: &Path) -> Result<DeliveryDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| unavailable(source, format!("reading header: {e}")))?
        .clone();

    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(unavailable(source, format!("missing column '{column}'")));
        }
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<DeliveryRecord>() {
        let record = result.map_err(|e| unavailable(source, describe_csv_error(&e)))?;
        records.push(record);
    }

    Ok(DeliveryDataset::from_records(records))
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.position() {
        Some(pos) => format!("line {}: {err}", pos.line()),
        None => err.to_string(),
    }
}

fn unavailable(path: &Path, reason: String) -> DashboardError {
    DashboardError::DataUnavailable {
        path: PathBuf::from(path),
        reason,
    }
}
