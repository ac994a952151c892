//! Merchant categorization: ordered keyword rules, their store, and the
//! interactive loop that grows them.

pub mod engine;
pub mod resolver;
pub mod rule_set;

pub use engine::{CategoryRuleEngine, RuleStore};
pub use resolver::{
    CategoryResolver, InteractiveCategorizer, InteractiveOutcome, Resolution, ScriptedResolver,
};
pub use rule_set::{CategoryRule, CategoryRuleSet};

/// Category given to merchants no rule matches.
pub const UNCATEGORIZED: &str = "Uncategorized";
