//! Descriptive statistics over an [`ObservationFrame`].

use crate::observations::columns::{COL_HUMIDITY, COL_PRECIP, COL_TEMP, COL_WIND};
use crate::observations::frame::ObservationFrame;
use crate::types::observation::ExtremeDay;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HumiditySummary {
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub std: Option<f64>,
}

/// Headline numbers for a whole table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasicSummary {
    pub temperature: TemperatureSummary,
    pub humidity: HumiditySummary,
    pub wind_mean: Option<f64>,
}

/// Statistics for one (table, period) pair.
///
/// Only built when at least one temperature value exists, so every temperature
/// field is a real value. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSnapshot {
    pub observations: usize,
    pub temp_mean: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Population standard deviation.
    pub temp_std: f64,
    pub temp_p25: f64,
    pub temp_p75: f64,
    pub humidity_mean: Option<f64>,
    pub wind_mean: Option<f64>,
    pub precipitation_total: f64,
    pub hottest: Option<ExtremeDay>,
    pub coldest: Option<ExtremeDay>,
    pub windiest: Option<ExtremeDay>,
}

impl PeriodSnapshot {
    /// The snapshot as `(label, value)` pairs, skipping metrics without data.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![
            ("Observations", self.observations as f64),
            ("Mean temperature (°C)", self.temp_mean),
            ("Minimum temperature (°C)", self.temp_min),
            ("Maximum temperature (°C)", self.temp_max),
            ("Temperature std dev (°C)", self.temp_std),
            ("Temperature 25th percentile (°C)", self.temp_p25),
            ("Temperature 75th percentile (°C)", self.temp_p75),
        ];
        if let Some(h) = self.humidity_mean {
            entries.push(("Mean humidity (%)", h));
        }
        if let Some(w) = self.wind_mean {
            entries.push(("Mean wind speed (km/h)", w));
        }
        entries.push(("Total precipitation (mm)", self.precipitation_total));
        entries
    }
}

fn f64_column<'a>(frame: &'a ObservationFrame, name: &str) -> PolarsResult<&'a Float64Chunked> {
    frame.frame().column(name)?.f64()
}

/// Mean/min/max temperature, mean and population std of humidity, mean wind.
pub fn summary(frame: &ObservationFrame) -> PolarsResult<BasicSummary> {
    let temp = f64_column(frame, COL_TEMP)?;
    let humidity = f64_column(frame, COL_HUMIDITY)?;
    let wind = f64_column(frame, COL_WIND)?;

    Ok(BasicSummary {
        temperature: TemperatureSummary {
            mean: temp.mean(),
            min: temp.min(),
            max: temp.max(),
        },
        humidity: HumiditySummary {
            mean: humidity.mean(),
            std: humidity.std(0),
        },
        wind_mean: wind.mean(),
    })
}

/// Sum of precipitation; missing values count as zero.
pub fn total_precipitation(frame: &ObservationFrame) -> PolarsResult<f64> {
    Ok(f64_column(frame, COL_PRECIP)?.sum().unwrap_or(0.0))
}

/// Builds the [`PeriodSnapshot`] for `frame`.
///
/// Temperature statistics ignore missing values. Percentiles use linear
/// interpolation between the closest ranks and the standard deviation is the
/// population one. Hottest, coldest and windiest days keep the first
/// occurrence on ties.
///
/// # Arguments
///
/// * `frame` - The observations of one period, usually the output of
///   [`ObservationFrame::filter_period`].
///
/// # Returns
///
/// `Ok(None)` when the frame is empty or has no temperature values. Callers
/// must treat that as "insufficient data", not as zeros.
///
/// # Errors
///
/// Returns a [`PolarsError`] if a canonical column is missing or not `Float64`.
///
/// # Example
///
/// ```no_run
/// use clima::{period_summary, Month, ObservationLoader};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let frame = ObservationLoader::default().load("data/sample_weather.csv".as_ref())?;
/// let february = frame.get_range(Month(2024, 2), Month(2024, 2))?;
/// if let Some(snapshot) = period_summary(&february)? {
///     println!("{:.1} °C on average", snapshot.temp_mean);
/// }
/// # Ok(())
/// # }
/// ```
pub fn period_summary(frame: &ObservationFrame) -> PolarsResult<Option<PeriodSnapshot>> {
    if frame.is_empty() {
        return Ok(None);
    }
    let temp = f64_column(frame, COL_TEMP)?;
    let (Some(temp_mean), Some(temp_min), Some(temp_max)) =
        (temp.mean(), temp.min(), temp.max())
    else {
        return Ok(None);
    };
    let percentile = |q| -> PolarsResult<f64> {
        Ok(temp
            .quantile(q, QuantileMethod::Linear)?
            .unwrap_or(temp_mean))
    };

    Ok(Some(PeriodSnapshot {
        observations: frame.height(),
        temp_mean,
        temp_min,
        temp_max,
        temp_std: temp.std(0).unwrap_or(0.0),
        temp_p25: percentile(0.25)?,
        temp_p75: percentile(0.75)?,
        humidity_mean: f64_column(frame, COL_HUMIDITY)?.mean(),
        wind_mean: f64_column(frame, COL_WIND)?.mean(),
        precipitation_total: total_precipitation(frame)?,
        hottest: frame.top_n(COL_TEMP, 1, false)?.into_iter().next(),
        coldest: frame.top_n(COL_TEMP, 1, true)?.into_iter().next(),
        windiest: frame.top_n(COL_WIND, 1, false)?.into_iter().next(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::loader::ObservationLoader;
    use crate::types::observation::Observation;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_days() -> ObservationFrame {
        ObservationFrame::from_observations(&[
            Observation::new(ymd(2024, 1, 1), 20.0, 80.0, 10.0, 1.0),
            Observation::new(ymd(2024, 1, 2), 25.0, 60.0, 14.0, 0.0),
            Observation::new(ymd(2024, 1, 3), 18.0, 70.0, 14.0, 2.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_period_summary_example() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = period_summary(&three_days())?.expect("snapshot");
        assert_eq!(snapshot.temp_mean, 21.0);
        assert_eq!(snapshot.temp_max, 25.0);
        assert_eq!(snapshot.temp_min, 18.0);
        assert_eq!(
            snapshot.hottest,
            Some(ExtremeDay {
                date: Some(ymd(2024, 1, 2)),
                value: 25.0
            })
        );
        assert_eq!(snapshot.coldest.unwrap().date, Some(ymd(2024, 1, 3)));
        assert_eq!(snapshot.temp_p25, 19.0);
        assert_eq!(snapshot.temp_p75, 22.5);
        assert_eq!(snapshot.precipitation_total, 3.5);
        assert_eq!(snapshot.observations, 3);
        Ok(())
    }

    #[test]
    fn test_percentiles_ignore_missing_values() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::from_observations(&[
            Observation::new(ymd(2024, 1, 1), 20.0, 80.0, 10.0, 1.0),
            Observation {
                date: Some(ymd(2024, 1, 2)),
                ..Default::default()
            },
            Observation::new(ymd(2024, 1, 3), 25.0, 60.0, 14.0, 0.0),
            Observation::new(ymd(2024, 1, 4), 18.0, 70.0, 14.0, 2.5),
        ])?;
        let snapshot = period_summary(&frame)?.unwrap();
        assert_eq!(snapshot.temp_p25, 19.0);
        assert_eq!(snapshot.temp_p75, 22.5);
        assert_eq!(snapshot.observations, 4);
        Ok(())
    }

    #[test]
    fn test_nan_temperature_is_missing() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(
            b"data,temperatura,umidade,vento,precipitacao\n\
              2024-01-01,20.0,80,10,0.0\n\
              2024-01-02,NaN,75,30,1.0\n\
              2024-01-03,22.0,70,12,0.0\n",
        )?;
        file.flush()?;
        let frame = ObservationLoader::default().load(file.path())?;

        let snapshot = period_summary(&frame)?.unwrap();
        assert_eq!(snapshot.temp_mean, 21.0);
        assert_eq!(snapshot.temp_max, 22.0);
        assert_eq!(snapshot.temp_p75, 21.5);
        assert_eq!(
            snapshot.hottest,
            Some(ExtremeDay {
                date: Some(ymd(2024, 1, 3)),
                value: 22.0
            })
        );
        assert_eq!(snapshot.coldest.unwrap().value, 20.0);
        assert_eq!(snapshot.windiest.unwrap().date, Some(ymd(2024, 1, 2)));
        Ok(())
    }

    #[test]
    fn test_population_std() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = period_summary(&three_days())?.unwrap();
        // population variance of [20, 25, 18] = 26 / 3
        assert!((snapshot.temp_std - (26.0f64 / 3.0).sqrt()).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_windiest_tie_takes_first_occurrence() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = period_summary(&three_days())?.unwrap();
        assert_eq!(snapshot.windiest.unwrap().date, Some(ymd(2024, 1, 2)));
        Ok(())
    }

    #[test]
    fn test_empty_table_gives_no_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let empty = ObservationFrame::from_observations(&[])?;
        assert_eq!(period_summary(&empty)?, None);
        Ok(())
    }

    #[test]
    fn test_missing_temperature_gives_no_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::from_observations(&[Observation {
            date: Some(ymd(2024, 1, 1)),
            humidity: Some(50.0),
            ..Default::default()
        }])?;
        assert_eq!(period_summary(&frame)?, None);
        Ok(())
    }

    #[test]
    fn test_basic_summary() -> Result<(), Box<dyn std::error::Error>> {
        let summary = summary(&three_days())?;
        assert_eq!(summary.temperature.mean, Some(21.0));
        assert_eq!(summary.temperature.min, Some(18.0));
        assert_eq!(summary.temperature.max, Some(25.0));
        assert_eq!(summary.humidity.mean, Some(70.0));
        // population std of [80, 60, 70]
        let std = summary.humidity.std.unwrap();
        assert!((std - (200.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((summary.wind_mean.unwrap() - 38.0 / 3.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_entries_skip_missing_metrics() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::from_observations(&[Observation {
            date: Some(ymd(2024, 1, 1)),
            temperature: Some(10.0),
            ..Default::default()
        }])?;
        let snapshot = period_summary(&frame)?.unwrap();
        let labels: Vec<&str> = snapshot.entries().iter().map(|e| e.0).collect();
        assert!(!labels.contains(&"Mean humidity (%)"));
        assert!(labels.contains(&"Total precipitation (mm)"));
        Ok(())
    }
}
