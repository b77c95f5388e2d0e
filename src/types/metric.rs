use crate::observations::columns::{COL_HUMIDITY, COL_PRECIP, COL_TEMP, COL_WIND};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The four measured quantities of an observation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
    Wind,
    Precipitation,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Wind,
        Metric::Precipitation,
    ];

    /// Canonical column holding this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Temperature => COL_TEMP,
            Metric::Humidity => COL_HUMIDITY,
            Metric::Wind => COL_WIND,
            Metric::Precipitation => COL_PRECIP,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Wind => "km/h",
            Metric::Precipitation => "mm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Wind => "Wind speed",
            Metric::Precipitation => "Precipitation",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
