use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open observation file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse CSV file '{0}'")]
    Csv(PathBuf, #[source] PolarsError),

    #[error("Required column '{column}' not found in '{path}' (headers: {headers})")]
    MissingColumn {
        path: PathBuf,
        column: String,
        headers: String,
    },

    #[error("File '{0}' contains no data rows")]
    NoRows(PathBuf),

    #[error("File '{0}' contains no row with a valid date")]
    NoValidDates(PathBuf),

    #[error("Failed building observation table: {0}")]
    Frame(#[from] PolarsError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create export file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV to '{0}'")]
    Write(PathBuf, #[source] PolarsError),

    #[error("Nothing to export: the table is empty")]
    Empty,
}
