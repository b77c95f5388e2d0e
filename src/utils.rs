use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "clima";
const CONFIG_FILE_NAME: &str = "config.json";

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Default location of the JSON config file, e.g. `~/.config/clima/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parses a date written in any of the layouts commonly found in station exports.
///
/// Day-first layouts win over month-first ones, so `03/04/2024` is the 3rd of April.
/// Date-time values are truncated to their date.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Days since 1970-01-01, the physical representation of a polars `Date`.
pub(crate) fn date_to_epoch_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

pub(crate) fn epoch_days_to_date(days: i32) -> NaiveDate {
    epoch() + chrono::Duration::days(days as i64)
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_flexible_date_layouts() {
        assert_eq!(parse_flexible_date("2024-01-31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_flexible_date("31/01/2024"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_flexible_date(" 2024/01/31 "), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_flexible_date("20240131"), Some(ymd(2024, 1, 31)));
        assert_eq!(
            parse_flexible_date("2024-01-31 13:45:00"),
            Some(ymd(2024, 1, 31))
        );
        assert_eq!(
            parse_flexible_date("2024-01-31T00:00:00.000"),
            Some(ymd(2024, 1, 31))
        );
    }

    #[test]
    fn test_parse_flexible_date_rejects_garbage() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("yesterday"), None);
        assert_eq!(parse_flexible_date("2024-02-30"), None);
    }

    #[test]
    fn test_epoch_days_round_trip() {
        assert_eq!(date_to_epoch_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_epoch_days(ymd(1970, 1, 11)), 10);
        assert_eq!(epoch_days_to_date(19_723), ymd(2024, 1, 1));
    }
}
