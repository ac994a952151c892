//! Rule store persistence and the classification engine.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::rule_set::{CategoryRule, CategoryRuleSet};
use crate::error::{Result, RulesError};

/// A rule set persisted as a single JSON object on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<CategoryRuleSet>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RulesError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into());
            }
        };

        let rules = CategoryRuleSet::from_json(&content).map_err(|reason| RulesError::Malformed {
            path: self.path.clone(),
            reason,
        })?;

        debug!("Loaded {} category rules from {}", rules.len(), self.path.display());
        Ok(Some(rules))
    }

    /// Write the whole rule set, creating parent directories as needed.
    pub fn save(&self, rules: &CategoryRuleSet) -> Result<()> {
        let data = rules.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RulesError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, data).map_err(|source| RulesError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!("Saved {} category rules to {}", rules.len(), self.path.display());
        Ok(())
    }
}

/// Classifies merchants against an ordered rule set and persists additions.
#[derive(Debug, Clone, Default)]
pub struct CategoryRuleEngine {
    rules: CategoryRuleSet,
    store: Option<RuleStore>,
    store_missing: bool,
}

impl CategoryRuleEngine {
    /// In-memory engine. [`CategoryRuleEngine::persist`] is a no-op.
    pub fn new(rules: CategoryRuleSet) -> Self {
        Self {
            rules,
            store: None,
            store_missing: false,
        }
    }

    /// Load the rules from `store`. A missing store is not an error: the
    /// engine starts empty and [`CategoryRuleEngine::store_missing`] is set.
    pub fn load(store: RuleStore) -> Result<Self> {
        let (rules, store_missing) = match store.load()? {
            Some(rules) => (rules, false),
            None => {
                warn!(
                    "Category rules file not found at {}, starting with no rules",
                    store.path().display()
                );
                (CategoryRuleSet::new(), true)
            }
        };

        Ok(Self {
            rules,
            store: Some(store),
            store_missing,
        })
    }

    /// Shorthand for `load(RuleStore::new(path))`.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(RuleStore::new(path))
    }

    /// Category for `merchant`, `"Uncategorized"` when no rule matches.
    pub fn classify(&self, merchant: &str) -> &str {
        self.rules.classify(merchant)
    }

    /// Append a rule. See [`CategoryRuleSet::add_rule`].
    pub fn add_rule(&mut self, keyword: &str, category: &str) -> bool {
        let added = self.rules.add_rule(keyword, category);
        if added {
            debug!("Added rule {:?} -> {:?}", keyword.trim(), category);
        } else {
            warn!("Keyword {:?} is blank or already has a rule, not adding it", keyword);
        }
        added
    }

    /// Write every rule (loaded and added) back to the store.
    pub fn persist(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&self.rules),
            None => {
                debug!("No rule store attached, skipping persist");
                Ok(())
            }
        }
    }

    pub fn rules(&self) -> &CategoryRuleSet {
        &self.rules
    }

    /// Rules added during this run.
    pub fn new_rules(&self) -> &[CategoryRule] {
        self.rules.added()
    }

    /// Whether the store did not exist when the engine was loaded.
    pub fn store_missing(&self) -> bool {
        self.store_missing
    }

    pub fn store(&self) -> Option<&RuleStore> {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::UNCATEGORIZED;
    use crate::error::StatementError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_store_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let engine = CategoryRuleEngine::from_path(dir.path().join("rules.json")).unwrap();

        assert!(engine.store_missing());
        assert!(engine.rules().is_empty());
        assert_eq!(engine.classify("anything"), UNCATEGORIZED);
    }

    #[test]
    fn test_malformed_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, "[\"not\", \"an object\"]").unwrap();

        let err = CategoryRuleEngine::from_path(&path).unwrap_err();
        assert!(matches!(err, StatementError::Rules(RulesError::Malformed { .. })));
    }

    #[test]
    fn test_persist_keeps_loaded_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"Shufersal": "Groceries", "Wolt": "Food Delivery"}"#).unwrap();

        let mut engine = CategoryRuleEngine::from_path(&path).unwrap();
        assert!(!engine.store_missing());
        assert_eq!(engine.classify("SHUFERSAL DEAL"), "Groceries");

        assert!(engine.add_rule("Paz", "Transportation"));
        engine.persist().unwrap();

        let reloaded = CategoryRuleEngine::from_path(&path).unwrap();
        let keywords: Vec<&str> = reloaded.rules().iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Shufersal", "Wolt", "Paz"]);
        assert!(reloaded.new_rules().is_empty());
    }

    #[test]
    fn test_persist_creates_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.json");

        let mut engine = CategoryRuleEngine::from_path(&path).unwrap();
        engine.add_rule("Cellcom", "Telecommunications");
        engine.persist().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n    \"Cellcom\": \"Telecommunications\"\n}\n");
    }

    #[test]
    fn test_in_memory_persist_is_noop() {
        let mut engine = CategoryRuleEngine::new(CategoryRuleSet::new());
        engine.add_rule("a", "b");
        engine.persist().unwrap();
        assert!(engine.store().is_none());
        assert_eq!(engine.new_rules().len(), 1);
    }
}
