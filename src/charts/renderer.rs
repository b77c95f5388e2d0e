use crate::analysis::correlation::CorrelationMatrix;
use crate::analysis::monthly::MonthlyAggregate;
use crate::charts::error::ChartError;
use crate::charts::figure::Figure;
use crate::charts::layered::{
    bars_under_line, count_histogram, density_histogram, gaussian_kde, Labels, DENSITY_POINTS,
};
use crate::observations::columns::{COL_DATE, COL_HUMIDITY, COL_PRECIP, COL_TEMP, COL_WIND};
use crate::observations::frame::ObservationFrame;
use crate::types::chart_style::ChartStyle;
use crate::types::metric::Metric;
use bon::bon;
use log::{debug, info};
use plotlars::{Axis, BarPlot, HeatMap, Legend, Orientation, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Writes charts as standalone HTML files into one output directory.
///
/// Every chart method returns the [`Figure`] it wrote, or
/// [`ChartError::NoData`] when its input has nothing to draw. File names are
/// fixed per chart, so rendering twice overwrites the previous files.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    style: ChartStyle,
}

#[bon]
impl ChartRenderer {
    /// Creates a renderer.
    ///
    /// # Arguments
    ///
    /// * `output_dir` - Directory the HTML files are written to, created on
    ///   first use. Defaults to `charts`.
    /// * `style` - Palette and grid visibility, defaults to [`ChartStyle::Darkgrid`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clima::{ChartRenderer, ChartStyle};
    ///
    /// let renderer = ChartRenderer::builder()
    ///     .output_dir("out/charts")
    ///     .style(ChartStyle::Pastel)
    ///     .build();
    /// assert_eq!(renderer.style(), ChartStyle::Pastel);
    /// ```
    #[builder]
    pub fn new(
        #[builder(into, default = PathBuf::from("charts"))] output_dir: PathBuf,
        #[builder(default)] style: ChartStyle,
    ) -> Self {
        Self { output_dir, style }
    }
}

impl ChartRenderer {
    /// Directory the charts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Style applied to every chart.
    pub fn style(&self) -> ChartStyle {
        self.style
    }

    /// Changes the style of the charts rendered from now on.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    fn title(&self, text: &str) -> Text {
        Text::from(text).size(18).color(self.style.text_color())
    }

    fn axis_title(&self, text: &str) -> Text {
        Text::from(text).color(self.style.text_color())
    }

    fn axis(&self) -> Axis {
        Axis::new()
            .show_grid(self.style.show_grid())
            .value_color(self.style.text_color())
    }

    fn color(&self, index: usize) -> Rgb {
        let mut palette = self.style.palette();
        let index = index % palette.len();
        palette.swap_remove(index)
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, ChartError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ChartError::OutputDir(self.output_dir.clone(), e))?;
        Ok(self.output_dir.join(file_name))
    }

    fn write(&self, plot: impl Plot, title: &str, file_name: &str) -> Result<Figure, ChartError> {
        let path = self.target(file_name)?;
        plot.write_html(path.to_string_lossy().into_owned());
        info!("Wrote chart '{}' to {}", title, path.display());
        Ok(Figure::new(title, path))
    }

    fn write_layered(
        &self,
        plot: plotly::Plot,
        title: &str,
        file_name: &str,
    ) -> Result<Figure, ChartError> {
        let path = self.target(file_name)?;
        plot.write_html(&path);
        info!("Wrote chart '{}' to {}", title, path.display());
        Ok(Figure::new(title, path))
    }

    /// Present values of one column.
    fn present(frame: &ObservationFrame, column: &str) -> PolarsResult<Float64Chunked> {
        let df = frame
            .frame()
            .clone()
            .lazy()
            .filter(col(column).is_not_null())
            .select([col(column)])
            .collect()?;
        Ok(df.column(column)?.f64()?.clone())
    }

    /// Dated rows sorted by date, with the date rendered as `YYYY-MM-DD` text.
    fn dated(frame: &ObservationFrame, columns: &[&str]) -> PolarsResult<DataFrame> {
        let mut selection = vec![col(COL_DATE).cast(DataType::String)];
        selection.extend(columns.iter().map(|c| col(*c)));
        frame
            .frame()
            .clone()
            .lazy()
            .filter(col(COL_DATE).is_not_null())
            .sort(
                [COL_DATE],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .select(selection)
            .collect()
    }

    fn require(df: &DataFrame, title: &str) -> Result<(), ChartError> {
        if df.height() == 0 {
            debug!("Skipping chart '{}': no rows", title);
            return Err(ChartError::NoData(title.to_string()));
        }
        Ok(())
    }

    /// Daily temperature as a line.
    pub fn temperature_series(&self, frame: &ObservationFrame) -> Result<Figure, ChartError> {
        let title = "Temperature over time";
        let df = Self::dated(frame, &[COL_TEMP])?;
        Self::require(&df, title)?;

        let plot = TimeSeriesPlot::builder()
            .data(&df)
            .x(COL_DATE)
            .y(COL_TEMP)
            .colors(vec![self.color(0)])
            .plot_title(self.title(title))
            .x_title(self.axis_title("Date"))
            .y_title(self.axis_title("Temperature (°C)"))
            .y_axis(&self.axis())
            .build();
        self.write(plot, title, "temperature.html")
    }

    /// Humidity and wind speed on a shared time axis.
    pub fn humidity_wind_series(&self, frame: &ObservationFrame) -> Result<Figure, ChartError> {
        let title = "Humidity and wind over time";
        let df = Self::dated(frame, &[COL_HUMIDITY, COL_WIND])?;
        Self::require(&df, title)?;

        let plot = TimeSeriesPlot::builder()
            .data(&df)
            .x(COL_DATE)
            .y(COL_HUMIDITY)
            .additional_series(vec![COL_WIND])
            .colors(vec![self.color(1), self.color(2)])
            .plot_title(self.title(title))
            .legend(&Legend::new().x(0.05).y(0.95))
            .x_title(self.axis_title("Date"))
            .y_title(self.axis_title("Humidity (%) / Wind (km/h)"))
            .y_axis(&self.axis())
            .build();
        self.write(plot, title, "humidity_wind.html")
    }

    /// One bar per day with the precipitation total.
    pub fn precipitation_bars(&self, frame: &ObservationFrame) -> Result<Figure, ChartError> {
        let title = "Precipitation by day";
        let df = Self::dated(frame, &[COL_PRECIP])?;
        Self::require(&df, title)?;

        let plot = BarPlot::builder()
            .data(&df)
            .labels(COL_DATE)
            .values(COL_PRECIP)
            .orientation(Orientation::Vertical)
            .colors(vec![self.color(1)])
            .plot_title(self.title(title))
            .x_title(self.axis_title("Date"))
            .y_title(self.axis_title("Precipitation (mm)"))
            .y_axis(&self.axis())
            .build();
        self.write(plot, title, "precipitation.html")
    }

    /// Bar chart of the `n` highest (`largest`) or lowest days for `metric`.
    pub fn extremes_chart(
        &self,
        frame: &ObservationFrame,
        metric: Metric,
        n: usize,
        largest: bool,
    ) -> Result<Figure, ChartError> {
        let direction = if largest { "highest" } else { "lowest" };
        let title = format!(
            "Top {} days with the {} {}",
            n,
            direction,
            metric.label().to_lowercase()
        );
        let days = frame.top_n(metric.column(), n, !largest)?;
        if days.is_empty() {
            return Err(ChartError::NoData(title));
        }

        let labels: Vec<String> = days
            .iter()
            .map(|d| {
                d.date.map_or_else(
                    || "unknown".to_string(),
                    |date| date.format("%d/%m/%Y").to_string(),
                )
            })
            .collect();
        let values: Vec<f64> = days.iter().map(|d| d.value).collect();
        let df = DataFrame::new(vec![
            Column::new(COL_DATE.into(), labels),
            Column::new(metric.column().into(), values),
        ])?;

        let plot = BarPlot::builder()
            .data(&df)
            .labels(COL_DATE)
            .values(metric.column())
            .orientation(Orientation::Vertical)
            .colors(vec![self.color(if largest { 3 } else { 1 })])
            .plot_title(self.title(&title))
            .x_title(self.axis_title("Date"))
            .y_title(self.axis_title(&format!("{} ({})", metric.label(), metric.unit())))
            .y_axis(&self.axis())
            .build();
        let file_name = format!("extremes_{}_{}.html", metric.column(), direction);
        self.write(plot, &title, &file_name)
    }

    /// Distribution of daily temperatures as a density histogram with a kernel
    /// density curve over it.
    ///
    /// The curve is left out when fewer than two distinct temperatures exist.
    pub fn temperature_histogram(&self, frame: &ObservationFrame) -> Result<Figure, ChartError> {
        let title = "Temperature distribution";
        let temps = Self::present(frame, COL_TEMP)?;
        if temps.is_empty() {
            return Err(ChartError::NoData(title.to_string()));
        }
        let density = gaussian_kde(&temps, DENSITY_POINTS)?;
        if density.is_none() {
            debug!("Drawing '{}' without a density curve", title);
        }

        let labels = Labels {
            title,
            x: "Temperature (°C)",
            y: "Density",
        };
        let values: Vec<f64> = temps.into_iter().flatten().collect();
        let plot = density_histogram(values, density, self.style, &labels);
        self.write_layered(plot, title, "temperature_histogram.html")
    }

    /// Distribution of daily relative humidity over ten bins.
    pub fn humidity_histogram(&self, frame: &ObservationFrame) -> Result<Figure, ChartError> {
        let title = "Humidity distribution";
        let humidity = Self::present(frame, COL_HUMIDITY)?;
        if humidity.is_empty() {
            return Err(ChartError::NoData(title.to_string()));
        }

        let labels = Labels {
            title,
            x: "Relative humidity (%)",
            y: "Frequency",
        };
        let values: Vec<f64> = humidity.into_iter().flatten().collect();
        let plot = count_histogram(values, 10, 1, self.style, &labels);
        self.write_layered(plot, title, "humidity_histogram.html")
    }

    pub fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> Result<Figure, ChartError> {
        let title = "Correlation between variables";
        if matrix.is_empty() {
            return Err(ChartError::NoData(title.to_string()));
        }
        let df = matrix.to_long_frame()?;

        let plot = HeatMap::builder()
            .data(&df)
            .x("x")
            .y("y")
            .z("r")
            .plot_title(self.title(title))
            .build();
        self.write(plot, title, "correlation.html")
    }

    /// Monthly mean temperature as a line on the left axis over monthly
    /// precipitation totals as bars on the right axis.
    pub fn monthly_chart(&self, rows: &[MonthlyAggregate]) -> Result<Figure, ChartError> {
        let title = "Monthly temperature and precipitation";
        if rows.is_empty() {
            return Err(ChartError::NoData(title.to_string()));
        }

        let months: Vec<String> = rows.iter().map(|r| r.month.to_string()).collect();
        let temps: Vec<Option<f64>> = rows.iter().map(|r| r.temp_mean).collect();
        let precipitation: Vec<f64> = rows.iter().map(|r| r.precipitation_total).collect();
        let labels = Labels {
            title,
            x: "Month",
            y: "Mean temperature (°C)",
        };
        let plot = bars_under_line(
            months,
            ("Mean temperature", temps),
            ("Total precipitation", precipitation),
            "Total precipitation (mm)",
            self.style,
            &labels,
        );
        self.write_layered(plot, title, "monthly.html")
    }

    /// The charts of a filtered period: temperature, humidity and wind,
    /// precipitation, and the temperature and humidity distributions.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::NoData`] for an empty frame, or the first error
    /// of the individual charts.
    pub fn period_figures(&self, frame: &ObservationFrame) -> Result<Vec<Figure>, ChartError> {
        if frame.is_empty() {
            return Err(ChartError::NoData("period charts".to_string()));
        }
        Ok(vec![
            self.temperature_series(frame)?,
            self.humidity_wind_series(frame)?,
            self.precipitation_bars(frame)?,
            self.temperature_histogram(frame)?,
            self.humidity_histogram(frame)?,
        ])
    }
}
