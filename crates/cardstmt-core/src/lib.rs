//! Core library for credit-card statement processing.
//!
//! This crate provides:
//! - Page text sources (PDF via lopdf, pre-extracted plain text)
//! - Transaction line grammars for right-to-left statement text
//! - Date, amount and card-number normalization
//! - An ordered keyword rule set for merchant categorization
//! - The pipeline that turns pages into sorted expense records

pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;
pub mod categorize;
pub mod pipeline;
pub mod legacy;

pub use error::{StatementError, PdfError, RulesError, Result};
pub use models::config::StatementConfig;
pub use models::expense::{Expense, RawTransaction, Statement, StatementPage};
pub use pdf::{PageSource, TextPageSource};
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
pub use statement::rules::{
    CardNumberExtractor, KeywordTable, LineOutcome, TransactionKind, TransactionLineMatcher,
};
pub use categorize::{
    CategoryResolver, CategoryRuleEngine, CategoryRuleSet, InteractiveCategorizer,
    InteractiveOutcome, Resolution, RuleStore, UNCATEGORIZED,
};
pub use pipeline::{Pipeline, PipelineReport};
pub use legacy::{migrate_document, migrate_records, MigrationOutcome};
