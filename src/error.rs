use crate::charts::ChartError;
use crate::config::ConfigError;
use crate::observations::error::{ExportError, LoadError};
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimaError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Period(#[from] PeriodError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A filter or lookup matched no rows. Informational, never fatal.
    #[error("No data: {0}")]
    EmptyResult(String),

    #[error("No observation file loaded")]
    NothingLoaded,

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClimaError {
    /// Whether the error should be shown as a notice rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, ClimaError::EmptyResult(_))
    }
}

/// Rejected period selection.
#[derive(Debug, Error)]
pub enum PeriodError {
    #[error(
        "Invalid date '{0}', expected YYYY-MM-DD, DD/MM/YYYY, YYYY/MM/DD, DD-MM-YYYY, \
         DD.MM.YYYY or YYYYMMDD, optionally followed by a time"
    )]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Period bound could not be resolved to a calendar date")]
    Unresolvable,
}
