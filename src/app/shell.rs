use crate::app::page::{Navigation, Page};
use crate::app::state::AppState;
use crate::charts::figure::Figure;
use crate::charts::kpi::kpi_dashboard;
use crate::charts::viewer::FigureViewer;
use crate::error::ClimaError;
use crate::types::chart_style::ChartStyle;
use crate::types::metric::Metric;
use clap::ValueEnum;
use log::{error, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const START_HELP: &str = "\
Commands:
  load <file>            load an observation CSV file
  period <start> <end>   select a period (YYYY-MM-DD, '-' for an open bound)
  style <name>           chart style (whitegrid, darkgrid, dark, white, ticks, pastel, muted)
  analyze                go to the analysis page
  quit";

const ANALYSIS_HELP: &str = "\
Commands:
  stats                  KPI dashboard and statistics of the period
  summary                comparative summary against the whole file
  table                  show the rows of the period
  export [file]          write the rows of the period to CSV
  graphs                 go to the graph options page
  back                   return to the start page
  quit";

const GRAPH_HELP: &str = "\
Commands:
  monthly                monthly temperature and precipitation chart
  extremes <metric> [high|low]
                         top days for temperature, humidity, wind or precipitation
  heatmap                correlation heatmap
  histogram              temperature and humidity distributions
  charts                 main charts of the period
  next / prev            step through the open charts
  back                   return to the analysis page
  quit";

/// Line-oriented front end over an [`AppState`].
///
/// Each command is handled at this boundary: errors are printed and the loop
/// goes on.
pub struct Shell<R, W> {
    state: AppState,
    input: R,
    output: W,
    viewer: FigureViewer,
    top_n: usize,
    delimiter: u8,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            input,
            output,
            viewer: FigureViewer::default(),
            top_n: 5,
            delimiter: b',',
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_header()?;
        let mut line = String::new();
        loop {
            write!(self.output, "{}> ", self.state.page().title().to_lowercase())?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some((command, args)) = words.split_first() else {
                continue;
            };
            if *command == "quit" || *command == "exit" {
                break;
            }
            let outcome = self.dispatch(command, args);
            self.report(outcome)?;
        }
        Ok(())
    }

    fn report(&mut self, outcome: Result<(), ClimaError>) -> io::Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.is_warning() => {
                warn!("{}", e);
                writeln!(self.output, "Notice: {}", e)
            }
            Err(e) => {
                error!("{}", e);
                writeln!(self.output, "Error: {}", e)
            }
        }
    }

    fn print_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "== {} ==", self.state.page())?;
        writeln!(self.output, "{}", self.state.csv_name())?;
        if self.state.period_selected() {
            writeln!(self.output, "{}", self.state.period_label())?;
        }
        writeln!(self.output, "Chart style: {}", self.state.chart_style())?;
        writeln!(self.output, "Type 'help' for commands.")
    }

    fn navigate(&mut self, nav: Navigation) -> Result<(), ClimaError> {
        if !self.state.navigate(nav) {
            let reason = if self.state.period_selected() {
                "that page is not reachable from here"
            } else {
                "select a period first"
            };
            return Err(ClimaError::EmptyResult(reason.to_string()));
        }
        if self.state.page() == Page::Start {
            self.viewer = FigureViewer::default();
        }
        self.print_header()?;
        Ok(())
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<(), ClimaError> {
        if command == "help" {
            let help = match self.state.page() {
                Page::Start => START_HELP,
                Page::Analysis => ANALYSIS_HELP,
                Page::GraphOptions => GRAPH_HELP,
            };
            writeln!(self.output, "{}", help)?;
            return Ok(());
        }
        match self.state.page() {
            Page::Start => self.start_command(command, args),
            Page::Analysis => self.analysis_command(command, args),
            Page::GraphOptions => self.graph_command(command, args),
        }
    }

    fn start_command(&mut self, command: &str, args: &[&str]) -> Result<(), ClimaError> {
        match command {
            "load" => {
                let path = PathBuf::from(args.join(" "));
                match self.state.load_csv(&path)? {
                    Some(bounds) => writeln!(
                        self.output,
                        "Loaded {}: {} to {}",
                        self.state.csv_name(),
                        bounds.start,
                        bounds.end
                    )?,
                    None => writeln!(self.output, "Loaded {}", self.state.csv_name())?,
                }
            }
            "period" => {
                let bound = |i: usize| match args.get(i) {
                    Some(&"-") | None => "",
                    Some(text) => *text,
                };
                let rows = self.state.select_period(bound(0), bound(1))?.height();
                writeln!(
                    self.output,
                    "{} ({} observations)",
                    self.state.period_label(),
                    rows
                )?;
            }
            "style" => {
                let name = args.first().copied().unwrap_or_default();
                match ChartStyle::from_str(name, true) {
                    Ok(style) => {
                        self.state.set_chart_style(style);
                        writeln!(self.output, "Chart style: {}", style)?;
                    }
                    Err(_) => writeln!(self.output, "Unknown style '{}'", name)?,
                }
            }
            "analyze" => self.navigate(Navigation::Analyze)?,
            _ => self.unknown(command)?,
        }
        Ok(())
    }

    fn analysis_command(&mut self, command: &str, args: &[&str]) -> Result<(), ClimaError> {
        match command {
            "stats" => {
                let snapshot = self.state.statistics()?;
                writeln!(self.output, "{}", kpi_dashboard(&snapshot))?;
                for (label, value) in snapshot.entries() {
                    writeln!(self.output, "  {:<34} {:>10.2}", label, value)?;
                }
            }
            "summary" => {
                let text = self.state.narrative()?;
                writeln!(self.output, "{}", text)?;
            }
            "table" => {
                let text = self.state.table_text()?;
                write!(self.output, "{}", text)?;
            }
            "export" => {
                let path = match args.first() {
                    Some(_) => PathBuf::from(args.join(" ")),
                    None => PathBuf::from(self.state.default_export_name()),
                };
                self.state.export(&path, self.delimiter)?;
                writeln!(self.output, "Exported to {}", path.display())?;
            }
            "graphs" => self.navigate(Navigation::Graphs)?,
            "back" => self.navigate(Navigation::Back)?,
            _ => self.unknown(command)?,
        }
        Ok(())
    }

    fn graph_command(&mut self, command: &str, args: &[&str]) -> Result<(), ClimaError> {
        match command {
            "monthly" => {
                let figure = self.state.monthly_chart()?;
                self.open(vec![figure])?;
            }
            "extremes" => {
                let Some(metric) = args.first().and_then(|m| Metric::from_str(m, true).ok())
                else {
                    writeln!(
                        self.output,
                        "Usage: extremes <temperature|humidity|wind|precipitation> [high|low]"
                    )?;
                    return Ok(());
                };
                let largest = !matches!(args.get(1), Some(&"low"));
                let figure = self.state.extremes_chart(metric, self.top_n, largest)?;
                for day in self.state.extremes(metric, self.top_n, largest)? {
                    let date = day.date.map_or_else(
                        || "unknown".to_string(),
                        |d| d.format("%d/%m/%Y").to_string(),
                    );
                    writeln!(self.output, "  {}  {:.1} {}", date, day.value, metric.unit())?;
                }
                self.open(vec![figure])?;
            }
            "heatmap" => {
                let figure = self.state.correlation_chart()?;
                self.open(vec![figure])?;
            }
            "histogram" => {
                let figures = self.state.histogram_charts()?;
                self.open(figures)?;
            }
            "charts" => {
                let figures = self.state.period_charts()?;
                self.open(figures)?;
            }
            "next" => {
                if let Some(figure) = self.viewer.next() {
                    let line = figure.to_string();
                    writeln!(self.output, "[{}] {}", self.viewer.position(), line)?;
                }
            }
            "prev" => {
                if let Some(figure) = self.viewer.prev() {
                    let line = figure.to_string();
                    writeln!(self.output, "[{}] {}", self.viewer.position(), line)?;
                }
            }
            "back" => self.navigate(Navigation::Back)?,
            _ => self.unknown(command)?,
        }
        Ok(())
    }

    fn open(&mut self, figures: Vec<Figure>) -> io::Result<()> {
        self.viewer = FigureViewer::new(figures);
        if let Some(figure) = self.viewer.current() {
            writeln!(self.output, "[{}] {}", self.viewer.position(), figure)?;
        }
        Ok(())
    }

    fn unknown(&mut self, command: &str) -> io::Result<()> {
        writeln!(
            self.output,
            "Unknown command '{}' on the {} page, type 'help'",
            command,
            self.state.page().title().to_lowercase()
        )
    }
}
