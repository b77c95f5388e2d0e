mod analysis;
mod app;
mod charts;
mod config;
mod error;
mod observations;
mod types;
mod utils;

pub use error::{ClimaError, PeriodError};

pub use observations::columns::*;
pub use observations::error::{ExportError, LoadError};
pub use observations::export::{default_export_name, export_csv};
pub use observations::frame::ObservationFrame;
pub use observations::loader::ObservationLoader;

pub use analysis::correlation::*;
pub use analysis::monthly::*;
pub use analysis::narrative::*;
pub use analysis::summary::*;

pub use charts::error::ChartError;
pub use charts::figure::Figure;
pub use charts::kpi::kpi_dashboard;
pub use charts::renderer::ChartRenderer;
pub use charts::viewer::FigureViewer;

pub use app::page::{Navigation, Page};
pub use app::shell::Shell;
pub use app::state::AppState;

pub use config::{Config, ConfigError};

pub use types::chart_style::ChartStyle;
pub use types::metric::Metric;
pub use types::observation::{ExtremeDay, Observation};
pub use types::period::Period;

pub use types::traits::any_date::AnyDate;
pub use types::traits::types::Month;
pub use types::traits::types::StartEndDate;
pub use types::traits::types::Year;

pub use utils::{default_config_path, parse_flexible_date};
