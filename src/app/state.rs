//! Contains the `AppState` that backs both the CLI and the interactive shell.

use crate::analysis::correlation::{correlation_matrix, CorrelationMatrix};
use crate::analysis::monthly::{monthly_aggregate, MonthlyAggregate};
use crate::analysis::narrative::narrative;
use crate::analysis::summary::{period_summary, PeriodSnapshot};
use crate::app::page::{Navigation, Page};
use crate::charts::figure::Figure;
use crate::charts::renderer::ChartRenderer;
use crate::error::ClimaError;
use crate::observations::export::{default_export_name, export_csv};
use crate::observations::frame::ObservationFrame;
use crate::observations::loader::ObservationLoader;
use crate::types::chart_style::ChartStyle;
use crate::types::metric::Metric;
use crate::types::observation::ExtremeDay;
use crate::types::period::Period;
use crate::types::traits::types::StartEndDate;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct LoadedTable {
    path: PathBuf,
    frame: ObservationFrame,
}

/// Everything the user has selected so far: the loaded file, the period and
/// its filtered rows, the chart style and the current page.
///
/// Every action reads the state; only `load_csv`, `select_period`,
/// `set_chart_style` and `navigate` change it.
///
/// # Errors
///
/// Actions that need a file return [`ClimaError::NothingLoaded`] before
/// [`AppState::load_csv`] succeeded. Actions that need a period return
/// [`ClimaError::EmptyResult`] (a warning, see [`ClimaError::is_warning`])
/// before [`AppState::select_period`] succeeded.
///
/// # Example
///
/// ```no_run
/// use clima::AppState;
/// use std::path::Path;
///
/// # fn main() -> Result<(), clima::ClimaError> {
/// let mut state = AppState::default();
/// state.load_csv(Path::new("data/sample_weather.csv"))?;
/// state.select_period("2024-01-01", "2024-03-31")?;
/// println!("{}", state.narrative()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    loader: ObservationLoader,
    renderer: ChartRenderer,
    table: Option<LoadedTable>,
    period: Option<Period>,
    filtered: Option<ObservationFrame>,
    page: Page,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ObservationLoader::default(), ChartRenderer::builder().build())
    }
}

impl AppState {
    /// Creates an empty state on the start page.
    ///
    /// # Arguments
    ///
    /// * `loader` - Reads the observation files passed to [`AppState::load_csv`].
    /// * `renderer` - Writes every chart, its style is the state's chart style.
    pub fn new(loader: ObservationLoader, renderer: ChartRenderer) -> Self {
        Self {
            loader,
            renderer,
            table: None,
            period: None,
            filtered: None,
            page: Page::Start,
        }
    }

    /// Loads a new observation file, replacing any previous table and period.
    ///
    /// # Arguments
    ///
    /// * `path` - The CSV file to read.
    ///
    /// # Returns
    ///
    /// The date range of the file, to pre-fill the period selection. `None`
    /// when no row has a date.
    ///
    /// # Errors
    ///
    /// [`ClimaError::Load`] when the file cannot be read or lacks a required
    /// column. On failure the state is reset: no table, no period, back on
    /// the start page.
    pub fn load_csv(&mut self, path: &Path) -> Result<Option<StartEndDate>, ClimaError> {
        self.reset();
        let frame = self.loader.load(path)?;
        let bounds = frame.date_bounds()?;
        self.table = Some(LoadedTable {
            path: path.to_path_buf(),
            frame,
        });
        Ok(bounds)
    }

    /// Drops the table and the period and returns to the start page.
    pub fn reset(&mut self) {
        self.table = None;
        self.period = None;
        self.filtered = None;
        self.page = Page::Start;
    }

    /// Parses and applies a period. Blank text leaves that bound open.
    ///
    /// # Arguments
    ///
    /// * `start` - First day, in any layout [`crate::parse_flexible_date`] accepts.
    /// * `end` - Last day (inclusive).
    ///
    /// # Returns
    ///
    /// The rows of the new period.
    ///
    /// # Errors
    ///
    /// [`ClimaError::Period`] for invalid dates or a reversed range, and
    /// [`ClimaError::EmptyResult`] when no row falls in the period. In both
    /// cases the previous selection is kept.
    pub fn select_period(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<&ObservationFrame, ClimaError> {
        let table = self.table()?;
        let period = Period::parse(Some(start), Some(end))?;
        let filtered = table.filter_period(&period)?;
        if filtered.is_empty() {
            warn!("No observations in {}", period);
            return Err(ClimaError::EmptyResult(format!(
                "no observations found for {}",
                period.label()
            )));
        }
        info!("Selected {} ({} rows)", period, filtered.height());
        self.period = Some(period);
        Ok(self.filtered.insert(filtered))
    }

    /// The full loaded table.
    pub fn table(&self) -> Result<&ObservationFrame, ClimaError> {
        self.table
            .as_ref()
            .map(|t| &t.frame)
            .ok_or(ClimaError::NothingLoaded)
    }

    /// The rows of the selected period.
    pub fn filtered(&self) -> Result<&ObservationFrame, ClimaError> {
        self.table()?;
        self.filtered
            .as_ref()
            .ok_or_else(|| ClimaError::EmptyResult("no period selected".to_string()))
    }

    /// The selected period, `None` until one was applied.
    pub fn period(&self) -> Option<Period> {
        self.period
    }

    /// Whether a period has been applied since the last load.
    pub fn period_selected(&self) -> bool {
        self.filtered.is_some()
    }

    /// `"Period: dd/mm/yyyy to dd/mm/yyyy"`, with `N/A` for open bounds.
    pub fn period_label(&self) -> String {
        self.period.unwrap_or_default().label()
    }

    /// File name of the loaded table.
    pub fn csv_name(&self) -> String {
        self.table
            .as_ref()
            .and_then(|t| t.path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No file loaded".to_string())
    }

    /// `dados_filtrados_<start>_<end>.csv` for the selected period.
    pub fn default_export_name(&self) -> String {
        default_export_name(&self.period.unwrap_or_default())
    }

    pub fn chart_style(&self) -> ChartStyle {
        self.renderer.style()
    }

    pub fn set_chart_style(&mut self, style: ChartStyle) {
        self.renderer.set_style(style);
    }

    /// The page the user is on.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Moves to another page if the transition is allowed. Returns whether it moved.
    pub fn navigate(&mut self, nav: Navigation) -> bool {
        match self.page.transition(nav, self.period_selected()) {
            Some(page) => {
                self.page = page;
                true
            }
            None => false,
        }
    }

    /// Statistics of the selected period.
    ///
    /// # Errors
    ///
    /// [`ClimaError::EmptyResult`] when the period has no temperature values.
    pub fn statistics(&self) -> Result<PeriodSnapshot, ClimaError> {
        period_summary(self.filtered()?)?.ok_or_else(|| {
            ClimaError::EmptyResult("no temperature data in the period".to_string())
        })
    }

    /// Comparative summary of the selected period against the whole file.
    pub fn narrative(&self) -> Result<String, ClimaError> {
        let period = period_summary(self.filtered()?)?;
        let alltime = period_summary(self.table()?)?;
        Ok(narrative(
            period.as_ref(),
            &self.period.unwrap_or_default(),
            alltime.as_ref(),
        ))
    }

    /// Monthly aggregates of the selected period.
    pub fn monthly(&self) -> Result<Vec<MonthlyAggregate>, ClimaError> {
        let rows = monthly_aggregate(self.filtered()?)?;
        if rows.is_empty() {
            return Err(ClimaError::EmptyResult(
                "not enough data for a monthly breakdown".to_string(),
            ));
        }
        Ok(rows)
    }

    /// Highest or lowest days of `metric` over the whole file.
    ///
    /// # Arguments
    ///
    /// * `metric` - The measurement to rank by.
    /// * `n` - Number of days to return at most.
    /// * `largest` - `true` for the highest values, `false` for the lowest.
    pub fn extremes(
        &self,
        metric: Metric,
        n: usize,
        largest: bool,
    ) -> Result<Vec<ExtremeDay>, ClimaError> {
        let days = self.table()?.top_n(metric.column(), n, !largest)?;
        if days.is_empty() {
            return Err(ClimaError::EmptyResult(format!("no values for {}", metric)));
        }
        Ok(days)
    }

    /// Correlation between the numeric columns of the whole file.
    pub fn correlation(&self) -> Result<CorrelationMatrix, ClimaError> {
        Ok(correlation_matrix(self.table()?)?)
    }

    /// Writes the filtered rows to `path`.
    pub fn export(&self, path: &Path, delimiter: u8) -> Result<(), ClimaError> {
        let filtered = self.filtered()?;
        if filtered.is_empty() {
            return Err(ClimaError::EmptyResult("nothing to export".to_string()));
        }
        export_csv(filtered, path, delimiter)?;
        Ok(())
    }

    pub fn period_charts(&self) -> Result<Vec<Figure>, ClimaError> {
        Ok(self.renderer.period_figures(self.filtered()?)?)
    }

    pub fn monthly_chart(&self) -> Result<Figure, ClimaError> {
        Ok(self.renderer.monthly_chart(&self.monthly()?)?)
    }

    pub fn extremes_chart(
        &self,
        metric: Metric,
        n: usize,
        largest: bool,
    ) -> Result<Figure, ClimaError> {
        Ok(self
            .renderer
            .extremes_chart(self.table()?, metric, n, largest)?)
    }

    pub fn correlation_chart(&self) -> Result<Figure, ClimaError> {
        Ok(self.renderer.correlation_heatmap(&self.correlation()?)?)
    }

    /// Temperature and humidity distributions of the whole file.
    pub fn histogram_charts(&self) -> Result<Vec<Figure>, ClimaError> {
        let table = self.table()?;
        Ok(vec![
            self.renderer.temperature_histogram(table)?,
            self.renderer.humidity_histogram(table)?,
        ])
    }

    /// The filtered rows as an aligned text table.
    pub fn table_text(&self) -> Result<String, ClimaError> {
        let rows = self.filtered()?.collect_observations()?;
        let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v));

        let mut out = format!(
            "{:<12} {:>12} {:>10} {:>10} {:>14}\n",
            "date", "temperature", "humidity", "wind", "precipitation"
        );
        for row in rows {
            let date = row
                .date
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
            out.push_str(&format!(
                "{:<12} {:>12} {:>10} {:>10} {:>14}\n",
                date,
                cell(row.temperature),
                cell(row.humidity),
                cell(row.wind_speed),
                cell(row.precipitation)
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn csv_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"data,temperatura,umidade,vento,precipitacao\n\
              2024-01-01,20,80,10,1.0\n\
              2024-01-02,25,60,14,0.0\n\
              2024-01-03,18,70,14,2.5\n\
              2024-02-01,30,50,20,12.0\n",
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    fn loaded() -> (AppState, NamedTempFile) {
        let file = csv_file();
        let mut state = AppState::default();
        state.load_csv(file.path()).unwrap();
        (state, file)
    }

    #[test]
    fn test_load_reports_bounds() -> Result<(), Box<dyn std::error::Error>> {
        let file = csv_file();
        let mut state = AppState::default();
        let bounds = state.load_csv(file.path())?.unwrap();
        assert_eq!(bounds.start.to_string(), "2024-01-01");
        assert_eq!(bounds.end.to_string(), "2024-02-01");
        assert_eq!(
            state.csv_name(),
            file.path().file_name().unwrap().to_string_lossy()
        );
        Ok(())
    }

    #[test]
    fn test_failed_load_resets_state() -> Result<(), Box<dyn std::error::Error>> {
        let (mut state, _file) = loaded();
        state.select_period("2024-01-01", "2024-01-31")?;
        assert!(state.load_csv(Path::new("/missing/file.csv")).is_err());
        assert!(matches!(state.table(), Err(ClimaError::NothingLoaded)));
        assert!(!state.period_selected());
        assert_eq!(state.page(), Page::Start);
        assert_eq!(state.csv_name(), "No file loaded");
        Ok(())
    }

    #[test]
    fn test_empty_period_keeps_previous_selection() -> Result<(), Box<dyn std::error::Error>> {
        let (mut state, _file) = loaded();
        state.select_period("2024-01-01", "2024-01-31")?;
        let err = state.select_period("2030-01-01", "2030-12-31").unwrap_err();
        assert!(err.is_warning());
        assert_eq!(state.period_label(), "Period: 01/01/2024 to 31/01/2024");
        assert_eq!(state.filtered()?.height(), 3);
        Ok(())
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        let (mut state, _file) = loaded();
        let err = state.select_period("2024-02-01", "2024-01-01").unwrap_err();
        assert!(matches!(err, ClimaError::Period(_)));
        assert!(!err.is_warning());
        assert!(!state.period_selected());
    }

    #[test]
    fn test_select_before_load_fails() {
        let mut state = AppState::default();
        assert!(matches!(
            state.select_period("2024-01-01", "2024-01-31"),
            Err(ClimaError::NothingLoaded)
        ));
    }

    #[test]
    fn test_navigation_follows_selection() -> Result<(), Box<dyn std::error::Error>> {
        let (mut state, _file) = loaded();
        assert!(!state.navigate(Navigation::Analyze));
        state.select_period("", "")?;
        assert!(state.navigate(Navigation::Analyze));
        assert!(state.navigate(Navigation::Graphs));
        assert_eq!(state.page(), Page::GraphOptions);
        Ok(())
    }

    #[test]
    fn test_actions_on_selected_period() -> Result<(), Box<dyn std::error::Error>> {
        let (mut state, _file) = loaded();
        state.select_period("2024-01-01", "2024-01-31")?;

        let stats = state.statistics()?;
        assert_eq!(stats.temp_mean, 21.0);
        assert_eq!(state.monthly()?.len(), 1);
        assert_eq!(state.default_export_name(), "dados_filtrados_20240101_20240131.csv");

        // Extremes look at the whole file, not only the period.
        let hottest = state.extremes(Metric::Temperature, 1, true)?;
        assert_eq!(hottest[0].value, 30.0);

        let text = state.narrative()?;
        assert!(text.contains("Period: 01/01/2024 to 31/01/2024"));
        assert!(text.contains("Temperature: colder than normal"));

        let table = state.table_text()?;
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("2024-01-03"));
        Ok(())
    }

    #[test]
    fn test_export_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let (mut state, _file) = loaded();
        state.select_period("2024-01-02", "")?;
        let dir = tempdir()?;
        let target = dir.path().join(state.default_export_name());
        state.export(&target, b',')?;

        let mut reloaded = AppState::default();
        reloaded.load_csv(&target)?;
        assert_eq!(reloaded.table()?.height(), 3);
        Ok(())
    }

    #[test]
    fn test_histograms_cover_the_whole_file() -> Result<(), Box<dyn std::error::Error>> {
        let file = csv_file();
        let dir = tempdir()?;
        let renderer = ChartRenderer::builder().output_dir(dir.path()).build();
        let mut state = AppState::new(ObservationLoader::default(), renderer);
        state.load_csv(file.path())?;

        let figures = state.histogram_charts()?;
        let titles: Vec<&str> = figures.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Temperature distribution", "Humidity distribution"]);
        assert!(figures.iter().all(|f| f.path().exists()));
        Ok(())
    }

    #[test]
    fn test_table_text_marks_missing_values() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(
            b"data,temperatura,umidade,vento,precipitacao\n\
              2024-01-01,20,,10,1.0\n\
              2024-01-02,NaN,60,14,0.0\n",
        )?;
        file.flush()?;
        let mut state = AppState::default();
        state.load_csv(file.path())?;
        state.select_period("", "")?;

        let table = state.table_text()?;
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date"));
        assert!(lines[1].starts_with("2024-01-01"));
        assert!(lines[1].contains(" 20.0 "));
        assert!(lines[1].contains(" - "));
        assert!(lines[2].contains(" - "));
        assert!(table.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_style_is_kept() {
        let mut state = AppState::default();
        assert_eq!(state.chart_style(), ChartStyle::Darkgrid);
        state.set_chart_style(ChartStyle::Muted);
        assert_eq!(state.chart_style(), ChartStyle::Muted);
    }
}
