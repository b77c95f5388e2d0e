use crate::analysis::summary::PeriodSnapshot;

const CARD_WIDTH: usize = 24;

fn card(title: &str, value: &str) -> [String; 4] {
    let inner = CARD_WIDTH - 2;
    let border = "─".repeat(inner);
    let line = |text: &str| {
        let pad = inner.saturating_sub(text.chars().count() + 1);
        format!("│ {}{}│", text, " ".repeat(pad))
    };
    [
        format!("┌{}┐", border),
        line(title),
        line(value),
        format!("└{}┘", border),
    ]
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1} {}", v, unit))
}

/// Four side-by-side text cards with the headline numbers of a period.
pub fn kpi_dashboard(snapshot: &PeriodSnapshot) -> String {
    let cards = [
        card(
            "Mean temperature",
            &format!("{:.1} °C", snapshot.temp_mean),
        ),
        card(
            "Mean humidity",
            &format_optional(snapshot.humidity_mean, "%"),
        ),
        card("Mean wind", &format_optional(snapshot.wind_mean, "km/h")),
        card(
            "Total precipitation",
            &format!("{:.1} mm", snapshot.precipitation_total),
        ),
    ];

    (0..4)
        .map(|row| {
            cards
                .iter()
                .map(|c| c[row].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
