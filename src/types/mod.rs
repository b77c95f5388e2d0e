pub mod chart_style;
pub mod metric;
pub mod observation;
pub mod period;
pub mod traits;
