use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::model::{COLUMNS, DeliveryRecord};
use crate::error::{DashboardError, Result};

/// File name offered by the download dialog.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_delivery_data.csv";

/// Write records in the input CSV schema: header row, then one row per
/// record, no index column. An empty slice still produces the header.
pub fn write_csv<'a, W, I>(records: I, writer: W) -> std::result::Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize records to an in-memory CSV document.
pub fn to_csv_bytes<'a, I>(records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    let mut buf = Vec::new();
    write_csv(records, &mut buf).map_err(|e| DashboardError::Export {
        path: "<memory>".into(),
        reason: e.to_string(),
    })?;
    Ok(buf)
}

/// Write records to `path`, replacing any existing file.
pub fn export_file<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    let export_err = |reason: String| DashboardError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = to_csv_bytes(records)?;
    let mut file = File::create(path).map_err(|e| export_err(format!("creating file: {e}")))?;
    file.write_all(&bytes)
        .map_err(|e| export_err(format!("writing file: {e}")))?;

    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}
