pub mod error;
pub mod figure;
pub mod kpi;
pub(crate) mod layered;
pub mod renderer;
pub mod viewer;

pub use error::ChartError;
