//! Canonical column names and header normalization.

use unicode_normalization::UnicodeNormalization;

pub const COL_DATE: &str = "data";
pub const COL_TEMP: &str = "temperatura"; // °C
pub const COL_HUMIDITY: &str = "umidade"; // %
pub const COL_WIND: &str = "vento"; // km/h
pub const COL_PRECIP: &str = "precipitacao"; // mm

/// Measured columns, in export order after the date.
pub const MEASUREMENT_COLUMNS: [&str; 4] = [COL_TEMP, COL_HUMIDITY, COL_WIND, COL_PRECIP];

const SEPARATORS: [char; 3] = ['(', ')', '/'];

/// Normalizes a CSV header so that spelling variants resolve to the same name.
///
/// `"Temperatura (°C)"` becomes `"temperatura_c"` and `"Precipitação"` becomes
/// `"precipitacao"`. Applying it twice gives the same result as applying it once.
pub fn normalize_column_name(name: &str) -> String {
    let ascii: String = name
        .trim()
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();

    let replaced: String = ascii
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || SEPARATORS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let mut out = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// Accepted header spellings (already normalized) for a canonical column.
fn aliases(canonical: &str) -> &'static [&'static str] {
    match canonical {
        COL_DATE => &["date", "dia", "day"],
        COL_TEMP => &["temperature", "temp"],
        COL_HUMIDITY => &["humidity", "umidade_relativa", "rh"],
        COL_WIND => &["wind", "wind_speed", "velocidade_vento"],
        COL_PRECIP => &["precipitation", "rain", "chuva", "prcp"],
        _ => &[],
    }
}

fn matches_canonical(normalized: &str, canonical: &str) -> bool {
    normalized == canonical
        || normalized
            .strip_prefix(canonical)
            .is_some_and(|rest| rest.starts_with('_'))
        || aliases(canonical).iter().any(|alias| {
            normalized == *alias
                || normalized
                    .strip_prefix(alias)
                    .is_some_and(|rest| rest.starts_with('_'))
        })
}

/// Finds the index of the first normalized header resolving to `canonical`.
///
/// Exact matches win over prefix or alias matches, so a file holding both
/// `temperatura` and `temperatura_max` resolves to the former.
pub fn resolve_column(normalized_headers: &[String], canonical: &str) -> Option<usize> {
    normalized_headers
        .iter()
        .position(|h| h == canonical)
        .or_else(|| {
            normalized_headers
                .iter()
                .position(|h| matches_canonical(h, canonical))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_units() {
        assert_eq!(normalize_column_name("Temperatura (°C)"), "temperatura_c");
        assert_eq!(normalize_column_name("Precipitação (mm)"), "precipitacao_mm");
        assert_eq!(normalize_column_name("  Umidade  "), "umidade");
        assert_eq!(normalize_column_name("Vento (km/h)"), "vento_km_h");
        assert_eq!(normalize_column_name("Data"), "data");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for header in [
            "Temperatura (°C)",
            "Precipitação (mm)",
            "Vento (km/h)",
            "__weird  / header__",
            "já_normalizado",
            "",
        ] {
            let once = normalize_column_name(header);
            assert_eq!(normalize_column_name(&once), once, "header {header:?}");
        }
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let headers: Vec<String> = ["temperatura_max", "temperatura", "data"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(resolve_column(&headers, COL_TEMP), Some(1));
        assert_eq!(resolve_column(&headers, COL_DATE), Some(2));
        assert_eq!(resolve_column(&headers, COL_WIND), None);
    }

    #[test]
    fn test_resolve_prefix_and_alias() {
        let headers: Vec<String> = [
            "date",
            "temperatura_c",
            "humidity",
            "wind_speed_kmh",
            "rain_mm",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(resolve_column(&headers, COL_DATE), Some(0));
        assert_eq!(resolve_column(&headers, COL_TEMP), Some(1));
        assert_eq!(resolve_column(&headers, COL_HUMIDITY), Some(2));
        assert_eq!(resolve_column(&headers, COL_WIND), Some(3));
        assert_eq!(resolve_column(&headers, COL_PRECIP), Some(4));
    }
}
