use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily weather record. Every field may be missing in the source file.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub date: Option<NaiveDate>,     // data
    pub temperature: Option<f64>,    // temperatura (°C)
    pub humidity: Option<f64>,       // umidade (%)
    pub wind_speed: Option<f64>,     // vento (km/h)
    pub precipitation: Option<f64>,  // precipitacao (mm)
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        precipitation: f64,
    ) -> Self {
        Self {
            date: Some(date),
            temperature: Some(temperature),
            humidity: Some(humidity),
            wind_speed: Some(wind_speed),
            precipitation: Some(precipitation),
        }
    }
}

/// A `(date, value)` pair picked out by a top-N lookup.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ExtremeDay {
    pub date: Option<NaiveDate>,
    pub value: f64,
}
