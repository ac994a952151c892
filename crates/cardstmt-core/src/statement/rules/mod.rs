//! Rule-based recognizers for statement text.

pub mod amounts;
pub mod bidi;
pub mod card;
pub mod dates;
pub mod lines;
pub mod patterns;

pub use amounts::{format_amount, parse_statement_amount};
pub use card::{CardNumberExtractor, PLACEHOLDER_CARD};
pub use dates::{month_name, parse_date, parse_legacy_date, year, DateNormalizer};
pub use lines::{KeywordTable, LineOutcome, TransactionKind, TransactionLineMatcher};

/// Trait for recognizers that pull one kind of value out of text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
