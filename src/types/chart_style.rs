use clap::ValueEnum;
use plotlars::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Visual theme applied to every rendered chart.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Whitegrid,
    #[default]
    Darkgrid,
    Dark,
    White,
    Ticks,
    Pastel,
    Muted,
}

impl ChartStyle {
    pub fn show_grid(self) -> bool {
        matches!(
            self,
            ChartStyle::Whitegrid | ChartStyle::Darkgrid | ChartStyle::Pastel | ChartStyle::Muted
        )
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ChartStyle::Darkgrid | ChartStyle::Dark)
    }

    pub fn text_color(self) -> Rgb {
        if self.is_dark() {
            Rgb(220, 228, 238)
        } else {
            Rgb(0, 0, 0)
        }
    }

    /// Series colors, primary first.
    pub fn palette(self) -> Vec<Rgb> {
        match self {
            ChartStyle::Pastel => vec![
                Rgb(161, 201, 244),
                Rgb(255, 180, 130),
                Rgb(141, 229, 161),
                Rgb(255, 159, 155),
            ],
            ChartStyle::Muted => vec![
                Rgb(72, 120, 208),
                Rgb(238, 133, 74),
                Rgb(106, 204, 100),
                Rgb(214, 95, 95),
            ],
            ChartStyle::Dark | ChartStyle::Darkgrid => vec![
                Rgb(235, 117, 0),
                Rgb(69, 157, 230),
                Rgb(120, 200, 120),
                Rgb(230, 90, 90),
            ],
            ChartStyle::Whitegrid | ChartStyle::White | ChartStyle::Ticks => vec![
                Rgb(31, 119, 180),
                Rgb(255, 127, 14),
                Rgb(44, 160, 44),
                Rgb(214, 39, 40),
            ],
        }
    }
}

impl Display for ChartStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartStyle::Whitegrid => "whitegrid",
            ChartStyle::Darkgrid => "darkgrid",
            ChartStyle::Dark => "dark",
            ChartStyle::White => "white",
            ChartStyle::Ticks => "ticks",
            ChartStyle::Pastel => "pastel",
            ChartStyle::Muted => "muted",
        };
        f.write_str(name)
    }
}
