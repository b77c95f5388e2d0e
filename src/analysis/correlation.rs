use crate::observations::frame::ObservationFrame;
use polars::prelude::*;
use serde::Serialize;

const LEFT: &str = "left";
const RIGHT: &str = "right";

/// Pearson correlation between every pair of numeric columns.
///
/// Symmetric, with `1.0` on the diagonal for every column that varies.
/// Coefficients that are undefined (constant column, fewer than two complete
/// pairs) are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Number of columns, the matrix is `len() x len()`.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the source had no numeric column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Long format (`x`, `y`, `r`), one row per cell, as used by heatmaps.
    pub fn to_long_frame(&self) -> PolarsResult<DataFrame> {
        let mut xs = Vec::with_capacity(self.len() * self.len());
        let mut ys = Vec::with_capacity(self.len() * self.len());
        let mut rs = Vec::with_capacity(self.len() * self.len());
        for (i, row) in self.values.iter().enumerate() {
            for (j, r) in row.iter().enumerate() {
                xs.push(self.columns[j].clone());
                ys.push(self.columns[i].clone());
                rs.push((!r.is_nan()).then_some(*r));
            }
        }
        DataFrame::new(vec![
            Column::new("x".into(), xs),
            Column::new("y".into(), ys),
            Column::new("r".into(), rs),
        ])
    }
}

/// Pearson coefficient of two columns over the rows where both are present.
///
/// `NaN` when fewer than two complete pairs remain or either side is constant.
fn pairwise_pearson(frame: &DataFrame, a: &str, b: &str) -> PolarsResult<f64> {
    let complete = frame
        .clone()
        .lazy()
        .select([
            col(a).cast(DataType::Float64).alias(LEFT),
            col(b).cast(DataType::Float64).alias(RIGHT),
        ])
        .filter(col(LEFT).is_not_null().and(col(RIGHT).is_not_null()))
        .collect()?;
    if complete.height() < 2 {
        return Ok(f64::NAN);
    }

    let r = complete
        .lazy()
        .select([pearson_corr(col(LEFT), col(RIGHT)).alias("r")])
        .collect()?
        .column("r")?
        .f64()?
        .get(0);
    Ok(r.filter(|r| r.is_finite())
        .map_or(f64::NAN, |r| r.clamp(-1.0, 1.0)))
}

/// Correlation matrix over all numeric columns, pairwise complete-case.
///
/// # Arguments
///
/// * `frame` - The observations, every numeric column takes part.
///
/// # Returns
///
/// A symmetric [`CorrelationMatrix`] in frame column order.
///
/// # Errors
///
/// Returns a [`PolarsError`] if a numeric column cannot be cast to `Float64`.
pub fn correlation_matrix(frame: &ObservationFrame) -> PolarsResult<CorrelationMatrix> {
    let columns = frame.numeric_columns();
    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pairwise_pearson(frame.frame(), &columns[i], &columns[j])?;
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix { columns, values })
}
