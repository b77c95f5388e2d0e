use crate::observations::error::ExportError;
use crate::observations::frame::ObservationFrame;
use crate::types::period::Period;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

const DATE_STAMP: &str = "%Y%m%d";

/// Writes `frame` as CSV with a header row. Dates are written as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] for an empty frame and an I/O or encoding
/// error if the destination cannot be written. The frame itself is never modified.
pub fn export_csv(frame: &ObservationFrame, path: &Path, delimiter: u8) -> Result<(), ExportError> {
    if frame.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut file = File::create(path).map_err(|e| ExportError::Io(path.to_path_buf(), e))?;
    let mut df = frame.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(delimiter)
        .finish(&mut df)
        .map_err(|e| ExportError::Write(path.to_path_buf(), e))?;
    info!("Exported {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Suggested export file name for a period, e.g. `dados_filtrados_20240101_20240131.csv`.
pub fn default_export_name(period: &Period) -> String {
    let stamp = |d: Option<chrono::NaiveDate>, fallback: &str| {
        d.map(|d| d.format(DATE_STAMP).to_string())
            .unwrap_or_else(|| fallback.to_string())
    };
    format!(
        "dados_filtrados_{}_{}.csv",
        stamp(period.start(), "inicio"),
        stamp(period.end(), "fim")
    )
}
