//! Date normalization for statement and legacy records.

use chrono::{Datelike, NaiveDate};

/// Formats printed on statement transaction lines.
pub const STATEMENT_FORMATS: &[&str] = &["%d/%m/%y"];

/// Formats found in legacy expense exports, in priority order.
pub const LEGACY_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];

/// Parses date strings against a fixed, ordered list of formats.
///
/// The first format that parses wins; the content of an ambiguous string is
/// never used to pick between formats.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    formats: &'static [&'static str],
}

impl DateNormalizer {
    /// Normalizer for statement lines (DD/MM/YY only).
    pub fn statement() -> Self {
        Self {
            formats: STATEMENT_FORMATS,
        }
    }

    /// Normalizer for the data-migration path.
    pub fn legacy() -> Self {
        Self {
            formats: LEGACY_FORMATS,
        }
    }

    /// Parse `raw`, returning `None` when no format matches or the date
    /// does not exist on the calendar.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        self.formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::statement()
    }
}

/// Parse a DD/MM/YY statement date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateNormalizer::statement().parse(raw)
}

/// Parse a date from a legacy export (DD/MM/YY, DD/MM/YYYY or YYYY-MM-DD).
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    DateNormalizer::legacy().parse(raw)
}

/// Full English month name, e.g. "November".
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Calendar year of `date`.
pub fn year(date: NaiveDate) -> i32 {
    date.year()
}
