//! Statement pipeline: pages in, sorted categorized expenses out.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::categorize::{CategoryResolver, CategoryRuleEngine, InteractiveCategorizer, UNCATEGORIZED};
use crate::error::Result;
use crate::models::config::{default_categories, StatementConfig};
use crate::models::expense::{Expense, RawTransaction, Statement, StatementPage};
use crate::pdf::PageSource;
use crate::statement::rules::{
    CardNumberExtractor, DateNormalizer, KeywordTable, LineOutcome, TransactionLineMatcher,
    PLACEHOLDER_CARD,
};

/// Counters collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub pages: usize,
    pub lines_scanned: usize,
    /// Header and running-total lines.
    pub lines_excluded: usize,
    /// Lines neither grammar recognized.
    pub lines_unmatched: usize,
    /// Matched lines whose charge was not a number.
    pub invalid_amounts: usize,
    /// Matched lines with a zero or negative charge.
    pub non_positive: usize,
    /// Raw transactions recognized.
    pub transactions: usize,
    /// Transactions dropped for an unparsable date.
    pub dates_skipped: usize,
    /// Expenses still uncategorized at the end of the run.
    pub uncategorized: usize,
    /// Merchants the interactive resolver was asked about.
    pub prompted: usize,
    /// The interactive pass stopped before every merchant was resolved.
    pub interrupted: bool,
    /// Rules registered during the run.
    pub rules_added: usize,
    /// Why the new rules could not be written back, if they could not.
    pub rules_persist_error: Option<String>,
    /// The rule store did not exist when loaded.
    pub rules_store_missing: bool,
    /// No card marker was found and the placeholder was used.
    pub card_missing: bool,
}

impl PipelineReport {
    /// Records skipped for any reason.
    pub fn total_skipped(&self) -> usize {
        self.invalid_amounts + self.non_positive + self.dates_skipped
    }
}

/// Orchestrates extraction, normalization and categorization.
#[derive(Debug, Clone)]
pub struct Pipeline {
    matcher: TransactionLineMatcher,
    card: CardNumberExtractor,
    dates: DateNormalizer,
    categorizer: InteractiveCategorizer,
}

impl Pipeline {
    /// Pipeline with the built-in grammar and category list.
    pub fn new() -> Self {
        Self {
            matcher: TransactionLineMatcher::builtin(),
            card: CardNumberExtractor::new(),
            dates: DateNormalizer::statement(),
            categorizer: InteractiveCategorizer::new(default_categories()),
        }
    }

    /// Pipeline with extra surface forms and categories from `config`.
    pub fn from_config(config: &StatementConfig) -> Result<Self> {
        let matcher = TransactionLineMatcher::new(KeywordTable::from_config(&config.parser))?;
        Ok(Self::new()
            .with_matcher(matcher)
            .with_categories(config.categorize.categories.clone()))
    }

    pub fn with_matcher(mut self, matcher: TransactionLineMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categorizer = InteractiveCategorizer::new(categories);
        self
    }

    pub fn matcher(&self) -> &TransactionLineMatcher {
        &self.matcher
    }

    /// Read all pages from `source` and process them.
    pub fn run(
        &self,
        source: &dyn PageSource,
        engine: &mut CategoryRuleEngine,
        resolver: Option<&mut dyn CategoryResolver>,
    ) -> Result<Statement> {
        let pages = source.pages()?;
        self.process_pages(&pages, engine, resolver)
    }

    /// Turn pages into a statement.
    ///
    /// With a resolver, unknown merchants are resolved interactively and the
    /// engine is persisted if at least one rule was added. A failed persist
    /// does not discard the statement; it is recorded in
    /// [`PipelineReport::rules_persist_error`].
    pub fn process_pages(
        &self,
        pages: &[StatementPage],
        engine: &mut CategoryRuleEngine,
        resolver: Option<&mut dyn CategoryResolver>,
    ) -> Result<Statement> {
        let mut report = PipelineReport {
            pages: pages.len(),
            rules_store_missing: engine.store_missing(),
            ..Default::default()
        };

        let card = self.card.card_for(pages);
        if card == PLACEHOLDER_CARD {
            warn!("No card number found on the first page, using {}", PLACEHOLDER_CARD);
            report.card_missing = true;
        }

        let raw = self.extract_transactions(pages, &mut report);
        info!("Recognized {} transactions on {} pages", raw.len(), pages.len());

        let mut expenses = self.normalize(raw, &card, engine, &mut report);

        if let Some(resolver) = resolver {
            let outcome = self.categorizer.run(&mut expenses, engine, resolver);
            report.prompted = outcome.prompted;
            report.interrupted = outcome.interrupted;
            report.rules_added = outcome.rules_added;

            if outcome.rules_added > 0 {
                if let Err(e) = engine.persist() {
                    error!("Failed to save {} new category rules: {}", outcome.rules_added, e);
                    report.rules_persist_error = Some(e.to_string());
                }
            }
        }

        report.uncategorized = expenses
            .iter()
            .filter(|e| e.category == UNCATEGORIZED)
            .count();

        expenses.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(Statement {
            card,
            expenses,
            report,
        })
    }

    /// Match every line of every page, in page then line order.
    pub fn extract_transactions(
        &self,
        pages: &[StatementPage],
        report: &mut PipelineReport,
    ) -> Vec<RawTransaction> {
        let mut transactions = Vec::new();

        for page in pages {
            for line in &page.lines {
                report.lines_scanned += 1;
                match self.matcher.match_line(line) {
                    LineOutcome::Transaction(tx) => {
                        report.transactions += 1;
                        transactions.push(tx);
                    }
                    LineOutcome::Excluded => report.lines_excluded += 1,
                    LineOutcome::NoMatch => report.lines_unmatched += 1,
                    LineOutcome::InvalidAmount => report.invalid_amounts += 1,
                    LineOutcome::NonPositive => report.non_positive += 1,
                }
            }
            debug!("Page {}: {} lines", page.number, page.lines.len());
        }

        transactions
    }

    /// Parse dates and classify. Transactions with a bad date are dropped.
    pub fn normalize(
        &self,
        transactions: Vec<RawTransaction>,
        card: &str,
        engine: &CategoryRuleEngine,
        report: &mut PipelineReport,
    ) -> Vec<Expense> {
        let mut expenses = Vec::with_capacity(transactions.len());

        for tx in transactions {
            let Some(date) = self.dates.parse(&tx.raw_date) else {
                warn!(
                    "Skipping transaction with invalid date '{}' from merchant: {}",
                    tx.raw_date, tx.merchant
                );
                report.dates_skipped += 1;
                continue;
            };

            let category = engine.classify(&tx.merchant).to_string();
            expenses.push(Expense::new(date, tx.merchant, tx.amount, category, card));
        }

        expenses
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
