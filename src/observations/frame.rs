//! Contains the `ObservationFrame` wrapper around a Polars `DataFrame` of daily observations.

use crate::error::ClimaError;
use crate::observations::columns::{COL_DATE, COL_HUMIDITY, COL_PRECIP, COL_TEMP, COL_WIND};
use crate::types::observation::{ExtremeDay, Observation};
use crate::types::period::Period;
use crate::types::traits::any_date::AnyDate;
use crate::types::traits::types::StartEndDate;
use crate::utils::{date_to_epoch_days, epoch_days_to_date};
use chrono::NaiveDate;
use polars::prelude::*;

/// A table of daily weather observations.
///
/// The wrapped `DataFrame` always holds a `data` column of type `Date` (nulls
/// for unparseable dates) and the `Float64` columns `temperatura`, `umidade`,
/// `vento` and `precipitacao`, followed by any extra columns from the source file.
///
/// Every operation returns a new frame; the wrapped data is never mutated.
///
/// Instances are usually obtained from [`crate::ObservationLoader::load`].
///
/// # Errors
///
/// Filters and accessors return a [`PolarsError`] when the wrapped frame
/// does not have the expected schema. Methods resolving calendar bounds
/// (`get_range`, `get_at`) return [`ClimaError::Period`] instead.
#[derive(Debug, Clone)]
pub struct ObservationFrame {
    frame: DataFrame,
}

impl ObservationFrame {
    /// Wraps a `DataFrame` that already has the observation schema.
    ///
    /// # Arguments
    ///
    /// * `frame` - A `DataFrame` with a `Date` column `data` and the four
    ///   `Float64` measurement columns.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed observations, mostly useful for tests and demos.
    ///
    /// `NaN` measurements are stored as missing values.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use clima::{Observation, ObservationFrame};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    /// let frame = ObservationFrame::from_observations(&[
    ///     Observation::new(day, 21.0, 70.0, 12.0, 0.0),
    ///     Observation::new(day.succ_opt().ok_or("bad date")?, f64::NAN, 75.0, 9.0, 2.5),
    /// ])?;
    /// assert_eq!(frame.height(), 2);
    /// assert_eq!(frame.values("temperatura")?, vec![Some(21.0), None]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_observations(observations: &[Observation]) -> PolarsResult<Self> {
        let dates: Vec<Option<i32>> = observations
            .iter()
            .map(|o| o.date.map(date_to_epoch_days))
            .collect();
        let float_column = |name: &str, get: fn(&Observation) -> Option<f64>| {
            let values: Vec<Option<f64>> = observations.iter().map(get).collect();
            Column::new(name.into(), values)
        };

        let frame = DataFrame::new(vec![
            Column::new(COL_DATE.into(), dates).cast(&DataType::Date)?,
            float_column(COL_TEMP, |o| o.temperature),
            float_column(COL_HUMIDITY, |o| o.humidity),
            float_column(COL_WIND, |o| o.wind_speed),
            float_column(COL_PRECIP, |o| o.precipitation),
        ])?;
        Ok(Self::new(Self::nan_as_missing(frame)?))
    }

    /// Replaces float `NaN` cells with nulls so every statistic treats them as missing.
    pub(crate) fn nan_as_missing(frame: DataFrame) -> PolarsResult<DataFrame> {
        let floats: Vec<Expr> = frame
            .get_columns()
            .iter()
            .filter(|c| c.dtype().is_float())
            .map(|c| col(c.name().clone()).fill_nan(lit(NULL)))
            .collect();
        if floats.is_empty() {
            return Ok(frame);
        }
        frame.lazy().with_columns(floats).collect()
    }

    /// The wrapped `DataFrame`, for Polars operations this type does not offer.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Unwraps the `DataFrame`.
    pub fn into_inner(self) -> DataFrame {
        self.frame
    }

    /// Number of rows, including rows without a date.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// `true` when the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Keeps the rows matching a Polars predicate expression.
    ///
    /// # Arguments
    ///
    /// * `predicate` - A Polars [`Expr`] over the observation columns.
    ///
    /// # Returns
    ///
    /// A new `ObservationFrame` with the matching rows, in their original order.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clima::{ObservationLoader, COL_WIND};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let frame = ObservationLoader::default().load("data/sample_weather.csv".as_ref())?;
    /// let windy = frame.filter(col(COL_WIND).gt(lit(30.0)))?;
    /// println!("{} windy days", windy.height());
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> PolarsResult<ObservationFrame> {
        let frame = self.frame.clone().lazy().filter(predicate).collect()?;
        Ok(ObservationFrame::new(frame))
    }

    /// Keeps the rows whose date lies in `period` (inclusive).
    ///
    /// Rows without a date are dropped as soon as either bound is set. The
    /// unbounded period returns every row.
    pub fn filter_period(&self, period: &Period) -> PolarsResult<ObservationFrame> {
        let lower = period.start().map(|start| col(COL_DATE).gt_eq(lit(start)));
        let upper = period.end().map(|end| col(COL_DATE).lt_eq(lit(end)));
        let predicate = match (lower, upper) {
            (Some(l), Some(u)) => l.and(u),
            (Some(l), None) => l,
            (None, Some(u)) => u,
            (None, None) => return Ok(self.clone()),
        };
        self.filter(predicate)
    }

    /// Filters to dates between `start` and `end` (inclusive).
    ///
    /// `start` and `end` can be any [`AnyDate`]: a `NaiveDate`, a date string,
    /// a [`crate::Month`] or a [`crate::Year`].
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::Period`] if a bound cannot be resolved or if
    /// `start` falls after `end`.
    pub fn get_range(
        &self,
        start: impl AnyDate,
        end: impl AnyDate,
    ) -> Result<ObservationFrame, ClimaError> {
        let period = Period::between(start, end)?;
        Ok(self.filter_period(&period)?)
    }

    /// Rows recorded on a single day (or, for a month or year, on its first day).
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::Period`] if `date` cannot be resolved.
    pub fn get_at(&self, date: impl AnyDate) -> Result<ObservationFrame, ClimaError> {
        let day = date
            .get_date_range()
            .ok_or(crate::error::PeriodError::Unresolvable)?
            .start;
        Ok(self.filter(col(COL_DATE).eq(lit(day)))?)
    }

    /// Days with precipitation strictly above `limit_mm`.
    pub fn rainy_days(&self, limit_mm: f64) -> PolarsResult<ObservationFrame> {
        self.filter(col(COL_PRECIP).gt(lit(limit_mm)))
    }

    /// Days with temperature strictly above `limit_c`.
    pub fn hot_days(&self, limit_c: f64) -> PolarsResult<ObservationFrame> {
        self.filter(col(COL_TEMP).gt(lit(limit_c)))
    }

    /// The `n` rows with the largest (`ascending == false`) or smallest values of `column`.
    ///
    /// Ties keep their original row order and rows where `column` is null are
    /// skipped. Only the date and the value are returned.
    ///
    /// # Arguments
    ///
    /// * `column` - A numeric column, e.g. [`crate::COL_TEMP`].
    /// * `n` - Maximum number of days to return.
    /// * `ascending` - `true` for the smallest values first.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if `column` does not exist or is not numeric.
    pub fn top_n(
        &self,
        column: &str,
        n: usize,
        ascending: bool,
    ) -> PolarsResult<Vec<ExtremeDay>> {
        let top = self
            .frame
            .clone()
            .lazy()
            .filter(col(column).is_not_null())
            .sort(
                [column],
                SortMultipleOptions::default()
                    .with_order_descending(!ascending)
                    .with_maintain_order(true),
            )
            .limit(n as IdxSize)
            .select([col(COL_DATE), col(column)])
            .collect()?;

        let dates = date_values(&top)?;
        let values = float_values(&top, column)?;
        Ok(dates
            .into_iter()
            .zip(values)
            .filter_map(|(date, value)| value.map(|value| ExtremeDay { date, value }))
            .collect())
    }

    /// Earliest and latest valid date, or `None` when no row has a date.
    pub fn date_bounds(&self) -> PolarsResult<Option<StartEndDate>> {
        let dates: Vec<NaiveDate> = self.dates()?.into_iter().flatten().collect();
        Ok(dates
            .iter()
            .min()
            .zip(dates.iter().max())
            .map(|(start, end)| StartEndDate {
                start: *start,
                end: *end,
            }))
    }

    /// The date column as chrono dates.
    pub fn dates(&self) -> PolarsResult<Vec<Option<NaiveDate>>> {
        date_values(&self.frame)
    }

    /// A numeric column as `f64` values.
    pub fn values(&self, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        float_values(&self.frame, column)
    }

    /// Names of every numeric column, in frame order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|c| is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Collects the canonical columns into typed rows.
    pub fn collect_observations(&self) -> PolarsResult<Vec<Observation>> {
        let dates = self.dates()?;
        let temperature = self.values(COL_TEMP)?;
        let humidity = self.values(COL_HUMIDITY)?;
        let wind = self.values(COL_WIND)?;
        let precipitation = self.values(COL_PRECIP)?;

        Ok((0..self.height())
            .map(|i| Observation {
                date: dates[i],
                temperature: temperature[i],
                humidity: humidity[i],
                wind_speed: wind[i],
                precipitation: precipitation[i],
            })
            .collect())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

/// Reads the `data` column of `df` as chrono dates.
pub(crate) fn date_values(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = df.column(COL_DATE)?.cast(&DataType::Int32)?;
    let dates = days
        .i32()?
        .into_iter()
        .map(|d| d.map(epoch_days_to_date))
        .collect();
    Ok(dates)
}

/// Reads a numeric column of `df`, casting to `f64`.
pub(crate) fn float_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    let out = values.f64()?.into_iter().collect();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::traits::types::{Month, Year};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> ObservationFrame {
        let mut rows: Vec<Observation> = (1..=10)
            .map(|d| {
                Observation::new(
                    ymd(2024, 1, d),
                    15.0 + d as f64,
                    60.0 + d as f64,
                    5.0 + d as f64,
                    if d % 3 == 0 { 12.0 } else { 0.5 },
                )
            })
            .collect();
        rows.push(Observation {
            date: None,
            temperature: Some(99.0),
            ..Default::default()
        });
        ObservationFrame::from_observations(&rows).unwrap()
    }

    #[test]
    fn test_filter_period_is_inclusive_subset() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let period = Period::new(Some(ymd(2024, 1, 3)), Some(ymd(2024, 1, 6)))?;
        let filtered = frame.filter_period(&period)?;

        assert_eq!(filtered.height(), 4);
        let all = frame.collect_observations()?;
        for row in filtered.collect_observations()? {
            assert!(period.contains(row.date));
            assert!(all.contains(&row));
        }
        Ok(())
    }

    #[test]
    fn test_open_ended_periods() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let from = frame.filter_period(&Period::new(Some(ymd(2024, 1, 8)), None)?)?;
        assert_eq!(from.height(), 3);
        let until = frame.filter_period(&Period::new(None, Some(ymd(2024, 1, 2)))?)?;
        assert_eq!(until.height(), 2);
        Ok(())
    }

    #[test]
    fn test_unbounded_period_keeps_missing_dates() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let all = frame.filter_period(&Period::all())?;
        assert_eq!(all.height(), 11);
        Ok(())
    }

    #[test]
    fn test_period_outside_coverage_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let filtered = frame.get_range(Year(2030), Year(2030))?;
        assert!(filtered.is_empty());
        Ok(())
    }

    #[test]
    fn test_get_range_with_month_and_get_at() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        assert_eq!(frame.get_range(Month(2024, 1), Month(2024, 1))?.height(), 10);
        let day = frame.get_at("2024-01-05")?;
        assert_eq!(day.values(COL_TEMP)?, vec![Some(20.0)]);
        Ok(())
    }

    #[test]
    fn test_get_range_rejects_reversed_bounds() {
        let err = sample().get_range("2024-01-05", "2024-01-01").unwrap_err();
        assert!(matches!(err, ClimaError::Period(_)));
    }

    #[test]
    fn test_top_n_orders_and_skips_nulls() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let hottest = frame.top_n(COL_TEMP, 2, false)?;
        assert_eq!(hottest[0].value, 99.0);
        assert_eq!(hottest[0].date, None);
        assert_eq!(hottest[1].date, Some(ymd(2024, 1, 10)));

        let calmest = frame.top_n(COL_WIND, 3, true)?;
        let values: Vec<f64> = calmest.iter().map(|d| d.value).collect();
        assert_eq!(values, vec![6.0, 7.0, 8.0]);
        Ok(())
    }

    #[test]
    fn test_top_n_ties_keep_row_order() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        let wettest = frame.top_n(COL_PRECIP, 3, false)?;
        let dates: Vec<Option<NaiveDate>> = wettest.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![Some(ymd(2024, 1, 3)), Some(ymd(2024, 1, 6)), Some(ymd(2024, 1, 9))]
        );
        Ok(())
    }

    #[test]
    fn test_top_and_bottom_are_disjoint() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample().filter_period(&Period::new(Some(ymd(2024, 1, 1)), None)?)?;
        let n = frame.height() / 2;
        let top = frame.top_n(COL_HUMIDITY, n, false)?;
        let bottom = frame.top_n(COL_HUMIDITY, n, true)?;
        assert_eq!(top.len(), n);
        assert!(top.iter().all(|t| !bottom.contains(t)));
        Ok(())
    }

    #[test]
    fn test_rainy_and_hot_days() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample();
        assert_eq!(frame.rainy_days(10.0)?.height(), 3);
        assert_eq!(frame.hot_days(30.0)?.height(), 1);
        Ok(())
    }

    #[test]
    fn test_date_bounds_ignore_missing() -> Result<(), Box<dyn std::error::Error>> {
        let bounds = sample().date_bounds()?.unwrap();
        assert_eq!(bounds.start, ymd(2024, 1, 1));
        assert_eq!(bounds.end, ymd(2024, 1, 10));
        Ok(())
    }

    #[test]
    fn test_numeric_columns() {
        assert_eq!(
            sample().numeric_columns(),
            vec![COL_TEMP, COL_HUMIDITY, COL_WIND, COL_PRECIP]
        );
    }
}
