//! clima - summarize and chart daily weather observations from a CSV file.

use clap::{Args, Parser, Subcommand};
use clima::{
    kpi_dashboard, summary, AppState, ChartRenderer, ChartStyle, ClimaError, Config, Metric,
    ObservationLoader, Shell, COL_HUMIDITY, COL_PRECIP, COL_TEMP,
};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "clima",
    version,
    about = "Summarize, compare and chart daily weather observations"
)]
struct Cli {
    /// Config file (defaults to <config dir>/clima/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chart style, overrides the config file
    #[arg(long, global = true, value_enum)]
    style: Option<ChartStyle>,

    /// Field delimiter of the CSV files, overrides the config file
    #[arg(long, global = true)]
    delimiter: Option<char>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Selection {
    /// Observation CSV file
    file: PathBuf,

    /// First day of the period (inclusive), e.g. 2024-01-01
    #[arg(short, long)]
    start: Option<String>,

    /// Last day of the period (inclusive)
    #[arg(short, long)]
    end: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Statistics and KPI cards for a period
    Summary(Selection),

    /// Compare a period against the whole file in plain text
    Narrative(Selection),

    /// Days with the highest or lowest values of a metric over the whole file
    Extremes {
        /// Observation CSV file
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Metric::Temperature)]
        metric: Metric,

        /// Show the lowest values instead of the highest
        #[arg(long)]
        lowest: bool,

        /// Number of days, overrides the config file
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Mean temperature, mean humidity and total precipitation per month
    Monthly(Selection),

    /// Correlation matrix of the numeric columns of the whole file
    Correlation {
        /// Observation CSV file
        file: PathBuf,
    },

    /// Write the charts of a period as HTML files
    Charts {
        #[command(flatten)]
        selection: Selection,

        /// Output directory, overrides the config file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the rows of a period
    Table(Selection),

    /// Write the rows of a period to a CSV file
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Destination file (defaults to dados_filtrados_<start>_<end>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive terminal session
    Interactive {
        /// Observation CSV file to load on start
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_warning() => {
            println!("Notice: {}", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ClimaError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(style) = cli.style {
        config.chart_style = style;
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    debug!("Effective config: {:?}", config);

    match cli.command {
        Command::Summary(selection) => {
            let state = select(&config, &selection)?;
            let basic = summary(state.filtered()?)?;
            let snapshot = state.statistics()?;
            let filtered = state.filtered()?;
            let hot = filtered.hot_days(config.hot_day_threshold_c)?.height();
            let rainy = filtered.rainy_days(config.rain_threshold_mm)?.height();

            println!("{}", state.csv_name());
            println!("{}", state.period_label());
            println!("{}", kpi_dashboard(&snapshot));
            for (label, value) in snapshot.entries() {
                println!("  {:<34} {:>10.2}", label, value);
            }
            if let Some(std) = basic.humidity.std {
                println!("  {:<34} {:>10.2}", "Humidity std dev (%)", std);
            }
            println!(
                "  {:<34} {:>10}",
                format!("Days above {:.1} °C", config.hot_day_threshold_c),
                hot
            );
            println!(
                "  {:<34} {:>10}",
                format!("Days above {:.1} mm", config.rain_threshold_mm),
                rainy
            );
        }
        Command::Narrative(selection) => {
            let state = select(&config, &selection)?;
            println!("{}", state.narrative()?);
        }
        Command::Extremes {
            file,
            metric,
            lowest,
            top,
        } => {
            let state = load(&config, &file)?;
            let n = top.unwrap_or(config.top_n);
            let direction = if lowest { "lowest" } else { "highest" };
            println!(
                "{} days with the {} {}",
                n,
                direction,
                metric.label().to_lowercase()
            );
            for day in state.extremes(metric, n, !lowest)? {
                let date = day
                    .date
                    .map_or_else(|| "unknown".to_string(), |d| d.to_string());
                println!("  {}  {:>8.1} {}", date, day.value, metric.unit());
            }
        }
        Command::Monthly(selection) => {
            let state = select(&config, &selection)?;
            println!(
                "{:<8} {:>12} {:>10} {:>14}",
                "month", COL_TEMP, COL_HUMIDITY, COL_PRECIP
            );
            for row in state.monthly()? {
                let cell =
                    |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v));
                println!(
                    "{:<8} {:>12} {:>10} {:>14.1}",
                    row.month.to_string(),
                    cell(row.temp_mean),
                    cell(row.humidity_mean),
                    row.precipitation_total
                );
            }
        }
        Command::Correlation { file } => {
            let state = load(&config, &file)?;
            let matrix = state.correlation()?;
            print!("{:>14}", "");
            for name in &matrix.columns {
                print!(" {:>14}", name);
            }
            println!();
            for (name, row) in matrix.columns.iter().zip(&matrix.values) {
                print!("{:>14}", name);
                for r in row {
                    if r.is_nan() {
                        print!(" {:>14}", "-");
                    } else {
                        print!(" {:>14.3}", r);
                    }
                }
                println!();
            }
        }
        Command::Charts {
            selection,
            output_dir,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let state = select(&config, &selection)?;
            let mut figures = state.period_charts()?;
            figures.push(state.monthly_chart()?);
            for figure in figures {
                println!("{}", figure);
            }
        }
        Command::Table(selection) => {
            let state = select(&config, &selection)?;
            print!("{}", state.table_text()?);
        }
        Command::Export { selection, output } => {
            let state = select(&config, &selection)?;
            let path = output.unwrap_or_else(|| PathBuf::from(state.default_export_name()));
            state.export(&path, config.delimiter_byte()?)?;
            println!("Exported to {}", path.display());
        }
        Command::Interactive { file } => {
            let mut state = new_state(&config)?;
            if let Some(file) = file {
                state.load_csv(&file)?;
            }
            let stdin = io::stdin();
            let mut shell = Shell::new(state, stdin.lock(), io::stdout())
                .with_top_n(config.top_n)
                .with_delimiter(config.delimiter_byte()?);
            shell.run()?;
        }
    }
    Ok(())
}

fn new_state(config: &Config) -> Result<AppState, ClimaError> {
    let loader = ObservationLoader::builder()
        .delimiter(config.delimiter_byte()?)
        .build();
    let renderer = ChartRenderer::builder()
        .output_dir(config.output_dir.clone())
        .style(config.chart_style)
        .build();
    Ok(AppState::new(loader, renderer))
}

fn load(config: &Config, file: &Path) -> Result<AppState, ClimaError> {
    let mut state = new_state(config)?;
    state.load_csv(file)?;
    Ok(state)
}

fn select(config: &Config, selection: &Selection) -> Result<AppState, ClimaError> {
    let mut state = load(config, &selection.file)?;
    state.select_period(
        selection.start.as_deref().unwrap_or_default(),
        selection.end.as_deref().unwrap_or_default(),
    )?;
    Ok(state)
}
