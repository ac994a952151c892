//! Interactive disambiguation of merchants no rule matches.
//!
//! The categorizer does not talk to a terminal itself. It asks an injected
//! [`CategoryResolver`] for each unknown merchant; the CLI binds that to
//! stdin/stdout, tests bind it to a script.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, warn};

use super::engine::CategoryRuleEngine;
use super::UNCATEGORIZED;
use crate::error::{Result, StatementError};
use crate::models::expense::Expense;

/// Answer for one unknown merchant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Use `category`, and remember `keyword` (the whole merchant when
    /// `None` or blank) for future runs.
    Assign {
        category: String,
        keyword: Option<String>,
    },
    /// Leave the merchant uncategorized and register nothing.
    Skip,
}

/// Capability that picks a category for a merchant.
pub trait CategoryResolver {
    fn resolve(&mut self, merchant: &str, categories: &[String]) -> Result<Resolution>;
}

impl<F> CategoryResolver for F
where
    F: FnMut(&str, &[String]) -> Result<Resolution>,
{
    fn resolve(&mut self, merchant: &str, categories: &[String]) -> Result<Resolution> {
        self(merchant, categories)
    }
}

/// Resolver that replays a fixed list of answers.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<Resolution>,
    asked: Vec<String>,
}

impl ScriptedResolver {
    pub fn new(answers: impl IntoIterator<Item = Resolution>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Merchants asked about so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl CategoryResolver for ScriptedResolver {
    fn resolve(&mut self, merchant: &str, _categories: &[String]) -> Result<Resolution> {
        self.asked.push(merchant.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| StatementError::Resolver("no scripted answer left".to_string()))
    }
}

/// Summary of one interactive pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractiveOutcome {
    /// Merchants the resolver was asked about.
    pub prompted: usize,
    /// Merchants given a category.
    pub assigned: usize,
    /// Merchants left uncategorized on purpose.
    pub skipped: usize,
    /// Rules registered in the engine.
    pub rules_added: usize,
    /// The resolver failed and the pass stopped early.
    pub interrupted: bool,
}

/// Asks about each distinct uncategorized merchant once and feeds the
/// answers back into the rule engine.
#[derive(Debug, Clone)]
pub struct InteractiveCategorizer {
    categories: Vec<String>,
}

impl InteractiveCategorizer {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct uncategorized merchants, in order of first appearance.
    pub fn pending_merchants(expenses: &[Expense]) -> Vec<String> {
        let mut seen = HashSet::new();
        expenses
            .iter()
            .filter(|e| e.category == UNCATEGORIZED)
            .filter(|e| seen.insert(e.merchant.as_str()))
            .map(|e| e.merchant.clone())
            .collect()
    }

    /// Resolve every pending merchant.
    ///
    /// Each answer updates all expenses of that merchant in place. A failing
    /// resolver ends the pass; rules registered up to that point are kept.
    pub fn run(
        &self,
        expenses: &mut [Expense],
        engine: &mut CategoryRuleEngine,
        resolver: &mut dyn CategoryResolver,
    ) -> InteractiveOutcome {
        let mut outcome = InteractiveOutcome::default();

        for merchant in Self::pending_merchants(expenses) {
            outcome.prompted += 1;

            let resolution = match resolver.resolve(&merchant, &self.categories) {
                Ok(resolution) => resolution,
                Err(e) => {
                    warn!("Stopping interactive categorization: {}", e);
                    outcome.interrupted = true;
                    break;
                }
            };

            let (category, keyword) = match resolution {
                Resolution::Assign { category, keyword } if !category.trim().is_empty() => {
                    (category, keyword)
                }
                Resolution::Assign { .. } => {
                    warn!("Blank category for {:?}, leaving it uncategorized", merchant);
                    outcome.skipped += 1;
                    continue;
                }
                Resolution::Skip => {
                    debug!("Skipped {:?}", merchant);
                    outcome.skipped += 1;
                    continue;
                }
            };

            let keyword = keyword
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| merchant.clone());

            if engine.add_rule(&keyword, &category) {
                outcome.rules_added += 1;
            }

            for expense in expenses.iter_mut().filter(|e| e.merchant == merchant) {
                expense.category = category.clone();
            }
            outcome.assigned += 1;
        }

        outcome
    }
}
