//! Templated plain-text comparison of a period against the whole record.

use crate::analysis::summary::PeriodSnapshot;
use crate::types::observation::ExtremeDay;
use crate::types::period::Period;

/// Temperature difference (°C) beyond which a period counts as hotter or colder.
pub const TEMP_THRESHOLD: f64 = 1.0;
/// Humidity difference (percentage points).
pub const HUMIDITY_THRESHOLD: f64 = 5.0;
/// Wind speed difference (km/h).
pub const WIND_THRESHOLD: f64 = 2.0;

pub const INSUFFICIENT_DATA: &str =
    "Insufficient data to generate a summary for the selected period.";
const NOT_AVAILABLE: &str = "not available";

/// Qualitative position of a period mean relative to the all-time mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Above,
    Within,
    Below,
}

impl Trend {
    /// Strict comparison: a delta exactly equal to the threshold is `Within`.
    pub fn classify(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Trend::Above
        } else if delta < -threshold {
            Trend::Below
        } else {
            Trend::Within
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Comparison {
    name: &'static str,
    unit: &'static str,
    threshold: f64,
    above: &'static str,
    below: &'static str,
}

const TEMPERATURE: Comparison = Comparison {
    name: "Temperature",
    unit: "°C",
    threshold: TEMP_THRESHOLD,
    above: "hotter than normal",
    below: "colder than normal",
};

const HUMIDITY: Comparison = Comparison {
    name: "Humidity",
    unit: "%",
    threshold: HUMIDITY_THRESHOLD,
    above: "more humid than average",
    below: "drier than average",
};

const WIND: Comparison = Comparison {
    name: "Wind",
    unit: "km/h",
    threshold: WIND_THRESHOLD,
    above: "windier than normal",
    below: "calmer than normal",
};

impl Comparison {
    fn label(&self, trend: Trend) -> &'static str {
        match trend {
            Trend::Above => self.above,
            Trend::Within => "within normal range",
            Trend::Below => self.below,
        }
    }
}

/// Label for a temperature delta.
pub fn temperature_label(delta: f64) -> &'static str {
    TEMPERATURE.label(Trend::classify(delta, TEMPERATURE.threshold))
}

/// Label for a humidity delta.
pub fn humidity_label(delta: f64) -> &'static str {
    HUMIDITY.label(Trend::classify(delta, HUMIDITY.threshold))
}

/// Label for a wind speed delta.
pub fn wind_label(delta: f64) -> &'static str {
    WIND.label(Trend::classify(delta, WIND.threshold))
}

fn average_line(metric: &Comparison, period: Option<f64>, alltime: Option<f64>) -> String {
    match (period, alltime) {
        (Some(p), Some(a)) => format!(
            "  {}: {:.1} {} (all-time {:.1} {}, {:+.1})\n",
            metric.name,
            p,
            metric.unit,
            a,
            metric.unit,
            p - a
        ),
        (Some(p), None) => format!("  {}: {:.1} {}\n", metric.name, p, metric.unit),
        _ => format!("  {}: {}\n", metric.name, NOT_AVAILABLE),
    }
}

fn comparison_line(metric: &Comparison, period: Option<f64>, alltime: Option<f64>) -> String {
    let verdict = match (period, alltime) {
        (Some(p), Some(a)) => metric.label(Trend::classify(p - a, metric.threshold)),
        _ => NOT_AVAILABLE,
    };
    format!("  {}: {}\n", metric.name, verdict)
}

fn notable_line(name: &str, unit: &str, day: Option<&ExtremeDay>) -> String {
    match day {
        Some(ExtremeDay {
            date: Some(date),
            value,
        }) => format!(
            "  {}: {} ({:.1} {})\n",
            name,
            date.format("%d/%m/%Y"),
            value,
            unit
        ),
        Some(ExtremeDay { date: None, value }) => {
            format!("  {}: unknown date ({:.1} {})\n", name, value, unit)
        }
        None => format!("  {}: {}\n", name, NOT_AVAILABLE),
    }
}

/// Builds the comparative summary of `period` against `alltime`.
///
/// The text has four sections: a header with the period label and the
/// number of observations, the period averages with the all-time mean and the
/// difference, a qualitative comparison per metric, and the notable days
/// followed by the total precipitation.
///
/// # Arguments
///
/// * `period` - Statistics of the selected period, from [`crate::period_summary`].
/// * `bounds` - The selected period, used for the header line.
/// * `alltime` - Statistics of the whole table, the reference of every comparison.
///
/// # Returns
///
/// [`INSUFFICIENT_DATA`] when `period` is `None`. Without an all-time
/// snapshot the averages are printed without reference and every comparison
/// reads "not available".
///
/// # Example
///
/// ```no_run
/// use clima::{narrative, period_summary, ObservationLoader, Period};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = ObservationLoader::default().load("data/sample_weather.csv".as_ref())?;
/// let bounds = Period::parse(Some("2024-02-01"), Some("2024-02-29"))?;
/// let february = period_summary(&table.filter_period(&bounds)?)?;
/// let alltime = period_summary(&table)?;
/// println!("{}", narrative(february.as_ref(), &bounds, alltime.as_ref()));
/// # Ok(())
/// # }
/// ```
pub fn narrative(
    period: Option<&PeriodSnapshot>,
    bounds: &Period,
    alltime: Option<&PeriodSnapshot>,
) -> String {
    let Some(snapshot) = period else {
        return INSUFFICIENT_DATA.to_string();
    };

    let mut out = String::from("Climate summary\n");
    out.push_str(&format!(
        "{} ({} observations)\n\n",
        bounds.label(),
        snapshot.observations
    ));

    let reference = |f: fn(&PeriodSnapshot) -> Option<f64>| alltime.and_then(f);
    let metrics: [(&Comparison, Option<f64>, Option<f64>); 3] = [
        (
            &TEMPERATURE,
            Some(snapshot.temp_mean),
            reference(|s| Some(s.temp_mean)),
        ),
        (
            &HUMIDITY,
            snapshot.humidity_mean,
            reference(|s| s.humidity_mean),
        ),
        (&WIND, snapshot.wind_mean, reference(|s| s.wind_mean)),
    ];

    out.push_str("Averages\n");
    for (metric, p, a) in metrics {
        out.push_str(&average_line(metric, p, a));
    }

    out.push_str("\nCompared with the full record\n");
    for (metric, p, a) in metrics {
        out.push_str(&comparison_line(metric, p, a));
    }

    out.push_str("\nNotable days\n");
    out.push_str(&notable_line("Hottest", "°C", snapshot.hottest.as_ref()));
    out.push_str(&notable_line("Coldest", "°C", snapshot.coldest.as_ref()));
    out.push_str(&notable_line("Windiest", "km/h", snapshot.windiest.as_ref()));
    out.push_str(&format!(
        "  Total precipitation: {:.1} mm",
        snapshot.precipitation_total
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(temp: f64, humidity: Option<f64>, wind: Option<f64>) -> PeriodSnapshot {
        PeriodSnapshot {
            observations: 3,
            temp_mean: temp,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            temp_std: 1.0,
            temp_p25: temp - 1.0,
            temp_p75: temp + 1.0,
            humidity_mean: humidity,
            wind_mean: wind,
            precipitation_total: 12.5,
            hottest: Some(ExtremeDay {
                date: NaiveDate::from_ymd_opt(2024, 1, 2),
                value: temp + 2.0,
            }),
            coldest: Some(ExtremeDay {
                date: NaiveDate::from_ymd_opt(2024, 1, 3),
                value: temp - 2.0,
            }),
            windiest: None,
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(temperature_label(1.0), "within normal range");
        assert_eq!(temperature_label(-1.0), "within normal range");
        assert_eq!(temperature_label(2.0), "hotter than normal");
        assert_eq!(temperature_label(-1.5), "colder than normal");
        assert_eq!(humidity_label(5.0), "within normal range");
        assert_eq!(humidity_label(5.5), "more humid than average");
        assert_eq!(humidity_label(-6.0), "drier than average");
        assert_eq!(wind_label(2.5), "windier than normal");
        assert_eq!(wind_label(-2.0), "within normal range");
        assert_eq!(wind_label(-3.0), "calmer than normal");
    }

    #[test]
    fn test_classify() {
        assert_eq!(Trend::classify(0.0, 1.0), Trend::Within);
        assert_eq!(Trend::classify(1.01, 1.0), Trend::Above);
        assert_eq!(Trend::classify(-1.01, 1.0), Trend::Below);
    }

    #[test]
    fn test_empty_snapshot_is_insufficient() {
        let alltime = snapshot(20.0, Some(70.0), Some(10.0));
        assert_eq!(
            narrative(None, &Period::all(), Some(&alltime)),
            INSUFFICIENT_DATA
        );
    }

    #[test]
    fn test_narrative_sections() -> Result<(), Box<dyn std::error::Error>> {
        let period = snapshot(22.0, Some(60.0), Some(11.0));
        let alltime = snapshot(20.0, Some(70.0), Some(10.0));
        let bounds = Period::parse(Some("2024-01-01"), Some("2024-01-31"))?;
        let text = narrative(Some(&period), &bounds, Some(&alltime));

        assert!(text.contains("Period: 01/01/2024 to 31/01/2024"));
        assert!(text.contains("Temperature: 22.0 °C (all-time 20.0 °C, +2.0)"));
        assert!(text.contains("Temperature: hotter than normal"));
        assert!(text.contains("Humidity: drier than average"));
        assert!(text.contains("Wind: within normal range"));
        assert!(text.contains("Hottest: 02/01/2024 (24.0 °C)"));
        assert!(text.contains("Windiest: not available"));
        assert!(text.ends_with("Total precipitation: 12.5 mm"));
        Ok(())
    }

    #[test]
    fn test_full_text_layout() -> Result<(), Box<dyn std::error::Error>> {
        let period = snapshot(22.0, Some(60.0), None);
        let alltime = snapshot(20.0, Some(70.0), Some(10.0));
        let bounds = Period::parse(Some("2024-01-01"), None)?;
        let text = narrative(Some(&period), &bounds, Some(&alltime));

        let expected = "\
Climate summary
Period: 01/01/2024 to N/A (3 observations)

Averages
  Temperature: 22.0 °C (all-time 20.0 °C, +2.0)
  Humidity: 60.0 % (all-time 70.0 %, -10.0)
  Wind: not available

Compared with the full record
  Temperature: hotter than normal
  Humidity: drier than average
  Wind: not available

Notable days
  Hottest: 02/01/2024 (24.0 °C)
  Coldest: 03/01/2024 (20.0 °C)
  Windiest: not available
  Total precipitation: 12.5 mm";
        assert_eq!(text, expected);
        Ok(())
    }

    #[test]
    fn test_missing_metric_is_not_available() {
        let period = snapshot(20.0, None, Some(10.0));
        let alltime = snapshot(20.0, Some(70.0), None);
        let text = narrative(Some(&period), &Period::all(), Some(&alltime));
        assert!(text.contains("Humidity: not available"));
        assert!(text.contains("Wind: not available"));
        assert!(text.contains("Temperature: within normal range"));
    }
}
