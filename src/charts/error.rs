use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to create chart output directory '{0}'")]
    OutputDir(PathBuf, #[source] std::io::Error),

    #[error("Failed preparing chart data: {0}")]
    Frame(#[from] PolarsError),

    #[error("Not enough data to draw '{0}'")]
    NoData(String),
}
