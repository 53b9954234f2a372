use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures surfaced by the data layer.
///
/// `DataUnavailable` and `InsufficientData` are fatal at startup; `Export`
/// is reported in the UI and the session carries on.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dataset unavailable ({path}): {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("insufficient data to fit rating model: {rows} rows, {required} required ({reason})")]
    InsufficientData {
        rows: usize,
        required: usize,
        reason: String,
    },

    #[error("export to {path} failed: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("invalid configuration ({path}): {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
