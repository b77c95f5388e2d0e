use crate::observations::columns::{COL_DATE, COL_HUMIDITY, COL_PRECIP, COL_TEMP};
use crate::observations::frame::{float_values, ObservationFrame};
use crate::types::traits::types::Month;
use crate::types::traits::utils::month_end;
use crate::utils::date_to_epoch_days;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

const COL_YEAR: &str = "year";
const COL_MONTH: &str = "month";

/// One calendar month of a filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month: Month,
    /// Last day of the month, used as the x position in charts.
    pub month_end: NaiveDate,
    pub temp_mean: Option<f64>,
    pub humidity_mean: Option<f64>,
    pub precipitation_total: f64,
}

/// Groups rows by calendar month: mean temperature, mean humidity, summed precipitation.
///
/// Rows without a date are ignored. Months are returned in ascending order and
/// only months that have at least one row appear.
pub fn monthly_aggregate(frame: &ObservationFrame) -> PolarsResult<Vec<MonthlyAggregate>> {
    let grouped = frame
        .frame()
        .clone()
        .lazy()
        .filter(col(COL_DATE).is_not_null())
        .with_columns([
            col(COL_DATE).dt().year().cast(DataType::Int32).alias(COL_YEAR),
            col(COL_DATE).dt().month().cast(DataType::Int32).alias(COL_MONTH),
        ])
        .group_by([col(COL_YEAR), col(COL_MONTH)])
        .agg([
            col(COL_TEMP).mean(),
            col(COL_HUMIDITY).mean(),
            col(COL_PRECIP).sum(),
        ])
        .sort([COL_YEAR, COL_MONTH], SortMultipleOptions::default())
        .collect()?;

    let years = grouped.column(COL_YEAR)?.i32()?.clone();
    let months = grouped.column(COL_MONTH)?.i32()?.clone();
    let temps = float_values(&grouped, COL_TEMP)?;
    let humidity = float_values(&grouped, COL_HUMIDITY)?;
    let precipitation = float_values(&grouped, COL_PRECIP)?;

    let mut rows = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        let (Some(year), Some(month)) = (years.get(i), months.get(i)) else {
            continue;
        };
        let month = month as u32;
        let Some(end) = month_end(year, month) else {
            continue;
        };
        rows.push(MonthlyAggregate {
            month: Month(year, month),
            month_end: end,
            temp_mean: temps[i],
            humidity_mean: humidity[i],
            precipitation_total: precipitation[i].unwrap_or(0.0),
        });
    }
    Ok(rows)
}

/// The aggregates as a frame (`mes`, `temperatura`, `umidade`, `precipitacao`) for charting.
pub fn monthly_frame(rows: &[MonthlyAggregate]) -> PolarsResult<DataFrame> {
    let days: Vec<i32> = rows
        .iter()
        .map(|r| date_to_epoch_days(r.month_end))
        .collect();
    DataFrame::new(vec![
        Column::new("mes".into(), days).cast(&DataType::Date)?,
        Column::new(
            COL_TEMP.into(),
            rows.iter().map(|r| r.temp_mean).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HUMIDITY.into(),
            rows.iter().map(|r| r.humidity_mean).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_PRECIP.into(),
            rows.iter()
                .map(|r| r.precipitation_total)
                .collect::<Vec<_>>(),
        ),
    ])
}
