use crate::observations::columns::{
    normalize_column_name, resolve_column, COL_DATE, COL_HUMIDITY, COL_PRECIP, COL_TEMP,
    COL_WIND, MEASUREMENT_COLUMNS,
};
use crate::observations::error::LoadError;
use crate::observations::frame::ObservationFrame;
use crate::utils::{date_to_epoch_days, parse_flexible_date};
use bon::bon;
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::Path;

/// Reads observation CSV files into an [`ObservationFrame`].
///
/// Headers are normalized with [`normalize_column_name`] and the canonical
/// columns (`data`, `temperatura`, `umidade`, `vento`, `precipitacao`) are
/// resolved from them. Unparseable dates and numbers become nulls instead of
/// failing the load, and so do `NaN` cells.
///
/// # Example
///
/// ```no_run
/// use clima::{ObservationLoader, COL_TEMP};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let loader = ObservationLoader::builder().delimiter(b';').build();
/// let frame = loader.load("data/estacao.csv".as_ref())?;
/// println!("{} rows, {:?}", frame.height(), frame.values(COL_TEMP)?.first());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ObservationLoader {
    delimiter: u8,
    infer_schema_rows: usize,
}

impl Default for ObservationLoader {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl ObservationLoader {
    /// Creates a loader.
    ///
    /// # Arguments
    ///
    /// * `delimiter` - Field separator byte, defaults to `b','`.
    /// * `infer_schema_rows` - Rows read to infer column types, defaults to 1000.
    #[builder]
    pub fn new(
        #[builder(default = b',')] delimiter: u8,
        #[builder(default = 1000)] infer_schema_rows: usize,
    ) -> Self {
        Self {
            delimiter,
            infer_schema_rows,
        }
    }

    /// Loads and normalizes the observation file at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - A CSV file with a header row.
    ///
    /// # Returns
    ///
    /// An [`ObservationFrame`] with the canonical columns first, followed by
    /// the remaining source columns under their normalized names.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be opened or parsed, if a
    /// required column is missing, or if no row has a usable date.
    pub fn load(&self, path: &Path) -> Result<ObservationFrame, LoadError> {
        std::fs::metadata(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;

        let delimiter = self.delimiter;
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_rows))
            .with_ignore_errors(true)
            .map_parse_options(move |opts| opts.with_separator(delimiter))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| LoadError::Csv(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| LoadError::Csv(path.to_path_buf(), e))?;

        if raw.height() == 0 {
            return Err(LoadError::NoRows(path.to_path_buf()));
        }

        let frame = Self::normalize(raw, path)?;
        info!(
            "Loaded {} observations from {}",
            frame.height(),
            path.display()
        );
        Ok(frame)
    }

    /// Renames headers, parses the date column and casts measurements to `f64`.
    fn normalize(raw: DataFrame, path: &Path) -> Result<ObservationFrame, LoadError> {
        let normalized: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|name| normalize_column_name(name.as_str()))
            .collect();

        let mut resolved = Vec::with_capacity(5);
        for canonical in [COL_DATE, COL_TEMP, COL_HUMIDITY, COL_WIND, COL_PRECIP] {
            let idx = resolve_column(&normalized, canonical).ok_or_else(|| {
                LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: canonical.to_string(),
                    headers: normalized.join(", "),
                }
            })?;
            debug!(
                "Column '{}' resolved from header '{}'",
                canonical, normalized[idx]
            );
            resolved.push(idx);
        }

        let source = raw.get_columns();
        let mut columns = Vec::with_capacity(source.len());

        let date_column = Self::parse_dates(&source[resolved[0]])?;
        let missing_dates = date_column.null_count();
        if missing_dates == raw.height() {
            return Err(LoadError::NoValidDates(path.to_path_buf()));
        }
        if missing_dates > 0 {
            warn!(
                "{} of {} rows in {} have an unparseable date",
                missing_dates,
                raw.height(),
                path.display()
            );
        }
        columns.push(date_column);

        for (canonical, idx) in MEASUREMENT_COLUMNS.iter().zip(&resolved[1..]) {
            let mut column = source[*idx].cast(&DataType::Float64)?;
            column.rename((*canonical).into());
            columns.push(column);
        }

        // Unrecognized columns are kept under their normalized names.
        let mut used: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
        for (idx, column) in source.iter().enumerate() {
            if resolved.contains(&idx) || used.contains(&normalized[idx]) {
                continue;
            }
            let mut extra = column.clone();
            extra.rename(normalized[idx].as_str().into());
            used.push(normalized[idx].clone());
            columns.push(extra);
        }

        let frame = ObservationFrame::nan_as_missing(DataFrame::new(columns)?)?;
        Ok(ObservationFrame::new(frame))
    }

    fn parse_dates(source: &Column) -> Result<Column, LoadError> {
        let text = source.cast(&DataType::String)?;
        let days: Vec<Option<i32>> = text
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_flexible_date).map(date_to_epoch_days))
            .collect();
        Ok(Column::new(COL_DATE.into(), days).cast(&DataType::Date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_normalizes_headers() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv(
            "Data,Temperatura (°C),Umidade (%),Vento (km/h),Precipitação (mm),Estação\n\
             2024-01-01,20.5,80,10,0.0,A\n\
             2024-01-02,25,70,12,3.5,A\n",
        );
        let frame = ObservationLoader::default().load(file.path())?;
        let names: Vec<String> = frame
            .frame()
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["data", "temperatura", "umidade", "vento", "precipitacao", "estacao"]
        );
        assert_eq!(frame.frame().column(COL_DATE)?.dtype(), &DataType::Date);
        assert_eq!(frame.frame().column(COL_HUMIDITY)?.dtype(), &DataType::Float64);
        assert_eq!(frame.height(), 2);
        Ok(())
    }

    #[test]
    fn test_bad_date_becomes_missing() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv(
            "data,temperatura,umidade,vento,precipitacao\n\
             2024-01-01,20,80,10,0\n\
             not-a-date,21,81,11,1\n\
             03/01/2024,22,82,12,2\n",
        );
        let frame = ObservationLoader::default().load(file.path())?;
        let dates = frame.dates()?;
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1),
                None,
                NaiveDate::from_ymd_opt(2024, 1, 3),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_semicolon_delimiter() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv(
            "data;temperatura;umidade;vento;precipitacao\n\
             2024-01-01;20;80;10;0\n",
        );
        let loader = ObservationLoader::builder().delimiter(b';').build();
        let frame = loader.load(file.path())?;
        assert_eq!(frame.values(COL_TEMP)?, vec![Some(20.0)]);
        Ok(())
    }

    #[test]
    fn test_nan_cells_load_as_missing() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv(
            "data,temperatura,umidade,vento,precipitacao,pressao\n\
             2024-01-01,20.0,80,10,0.0,1012.5\n\
             2024-01-02,NaN,nan,11,1.5,NaN\n\
             2024-01-03,22.0,82,12,0.0,1010.0\n",
        );
        let frame = ObservationLoader::default().load(file.path())?;
        assert_eq!(frame.values(COL_TEMP)?, vec![Some(20.0), None, Some(22.0)]);
        assert_eq!(frame.values(COL_HUMIDITY)?, vec![Some(80.0), None, Some(82.0)]);
        assert_eq!(frame.frame().column(COL_TEMP)?.null_count(), 1);
        assert_eq!(frame.frame().column("pressao")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObservationLoader::default()
            .load(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv("data,temperatura,umidade\n2024-01-01,20,80\n");
        let err = ObservationLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "vento"));
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let file = write_csv("data,temperatura,umidade,vento,precipitacao\n");
        let err = ObservationLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoRows(_)));
    }

    #[test]
    fn test_no_valid_dates_is_rejected() {
        let file = write_csv(
            "data,temperatura,umidade,vento,precipitacao\n\
             soon,20,80,10,0\n\
             later,21,81,11,1\n",
        );
        let err = ObservationLoader::default().load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoValidDates(_)));
    }
}
