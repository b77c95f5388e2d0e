use crate::error::PeriodError;
use crate::types::traits::any_date::AnyDate;
use crate::types::traits::types::StartEndDate;
use crate::utils::parse_flexible_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// An inclusive date range. A missing bound is unbounded in that direction.
///
/// `start > end` cannot be represented: every constructor validates the bounds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl Period {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, PeriodError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(PeriodError::StartAfterEnd { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// The unbounded period, matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a period from anything resolving to dates: the start bound uses the
    /// first day of `start`, the end bound the last day of `end`.
    pub fn between(start: impl AnyDate, end: impl AnyDate) -> Result<Self, PeriodError> {
        let start = start.get_date_range().ok_or(PeriodError::Unresolvable)?.start;
        let end = end.get_date_range().ok_or(PeriodError::Unresolvable)?.end;
        Self::new(Some(start), Some(end))
    }

    /// Parses user-entered bounds. Blank text means "no bound".
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, PeriodError> {
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether a row with this date belongs to the period.
    ///
    /// A missing date only matches the unbounded period.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match date {
            None => !self.is_bounded(),
            Some(d) => self.start.map_or(true, |s| d >= s) && self.end.map_or(true, |e| d <= e),
        }
    }

    /// Human readable label, e.g. `Period: 01/01/2024 to 31/01/2024`.
    pub fn label(&self) -> String {
        format!("Period: {}", self)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fmt_bound = |d: Option<NaiveDate>| {
            d.map(|d| d.format(DISPLAY_FORMAT).to_string())
                .unwrap_or_else(|| "N/A".to_string())
        };
        write!(f, "{} to {}", fmt_bound(self.start), fmt_bound(self.end))
    }
}

impl From<StartEndDate> for Period {
    fn from(range: StartEndDate) -> Self {
        // StartEndDate values are always produced with start <= end.
        Self {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

fn parse_bound(text: Option<&str>) -> Result<Option<NaiveDate>, PeriodError> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => parse_flexible_date(t)
            .map(Some)
            .ok_or_else(|| PeriodError::InvalidDate(t.to_string())),
    }
}
