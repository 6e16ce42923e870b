use crate::cell_detection::Real;
use std::path::PathBuf;
use thiserror::Error;

pub(crate) type LoadResult<T> = Result<T, DataShapeError>;
pub(crate) type WriteResult<T> = Result<T, WriteError>;

/// Raised before the pipeline runs, when a calibration constant or the blank
/// series would leave a division or the baseline undefined.
#[derive(Debug, Error)]
pub(crate) enum ConfigurationError {
    #[error("{name} must be a finite number greater than zero, got {value}")]
    NonPositive { name: &'static str, value: Real },
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: Real },
    #[error("Blank series is empty, the baseline is undefined")]
    EmptyBlank,
    #[error("Blank series has no readable intensity values, the baseline is undefined")]
    NoBlankIntensity,
}

impl ConfigurationError {
    pub(crate) fn check_positive(name: &'static str, value: Real) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::NonPositive { name, value })
        }
    }

    pub(crate) fn check_finite(name: &'static str, value: Real) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinite { name, value })
        }
    }
}

/// Raised at the load boundary when the raw export tables do not line up.
#[derive(Debug, Error)]
pub(crate) enum DataShapeError {
    #[error("IO Error: {error} at {}", .path.display())]
    IO {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("CSV Error: {error} in {table}")]
    Csv { error: csv::Error, table: String },
    #[error("Column '{column}' missing from {table}")]
    MissingColumn {
        column: &'static str,
        table: String,
    },
    #[error("Unreadable time value '{value}' at row {row} of {table}")]
    InvalidTime {
        value: String,
        row: usize,
        table: String,
    },
    #[error("Inconsistent Numbers of Rows: {time_table} has {time_rows}, {intensity_table} has {intensity_rows}")]
    MisalignedRows {
        time_table: String,
        time_rows: usize,
        intensity_table: String,
        intensity_rows: usize,
    },
}

/// Raised while persisting a run. The partially written output directory is removed.
#[derive(Debug, Error)]
pub(crate) enum WriteError {
    #[error("Output directory already exists: {0}")]
    DirectoryExists(PathBuf),
    #[error("IO Error: {error} at {}", .path.display())]
    IO {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("CSV Error: {error} at {}", .path.display())]
    Csv { error: csv::Error, path: PathBuf },
    #[error("JSON Error: {error} at {}", .path.display())]
    Json {
        error: serde_json::Error,
        path: PathBuf,
    },
    #[error("Chart Error: {error} at {}", .path.display())]
    Chart { error: String, path: PathBuf },
}
