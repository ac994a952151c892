//! Statement records: raw transactions, normalized expenses and pages.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineReport;
use crate::statement::rules::dates::{month_name, year};
use crate::statement::rules::TransactionKind;

/// One page of extracted statement text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Text lines in extraction order.
    pub lines: Vec<String>,
}

impl StatementPage {
    /// Build a page by splitting extracted text on line breaks.
    pub fn from_text(number: u32, text: &str) -> Self {
        Self {
            number,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Page text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A transaction recognized on a statement line, before date normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    /// Date token as it appeared on the line (DD/MM/YY).
    pub raw_date: String,
    /// Merchant text, already display-order corrected.
    pub merchant: String,
    /// Charge amount for this statement. Always positive.
    pub amount: Decimal,
    /// Original transaction amount (installment total for installments).
    pub original_amount: Option<Decimal>,
    /// Which transaction-type keyword the line carried.
    pub kind: TransactionKind,
}

/// A normalized, categorized expense record.
///
/// The serialized shape is the create payload of the expenses API:
/// `{"date": "YYYY-MM-DD", "merchant", "amount": number, "category",
/// "month", "year", "card"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub merchant: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    /// Full English month name of `date`.
    pub month: String,
    pub year: i32,
    /// Last four digits of the card.
    pub card: String,
}

impl Expense {
    /// Create an expense, deriving `month` and `year` from `date`. `amount`
    /// is rounded and padded to exactly two fractional digits.
    pub fn new(
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        card: impl Into<String>,
    ) -> Self {
        let mut amount = amount.round_dp(2);
        amount.rescale(2);

        Self {
            date,
            merchant: merchant.into(),
            amount,
            category: category.into(),
            month: month_name(date),
            year: year(date),
            card: card.into(),
        }
    }
}

/// The working result for one statement document.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    /// Card identifier, `"0000"` when it could not be found.
    pub card: String,
    /// Expenses sorted by date, newest first.
    pub expenses: Vec<Expense>,
    /// Counters collected while processing.
    pub report: PipelineReport,
}

impl Statement {
    /// Number of expenses per category, most frequent first (ties by name).
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for expense in &self.expenses {
            *counts.entry(expense.category.as_str()).or_insert(0) += 1;
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(category, count)| (category.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Sum of all expense amounts.
    pub fn total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}
