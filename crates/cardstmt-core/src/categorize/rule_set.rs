//! Ordered keyword to category rules.

use serde::Serialize;
use serde_json::{Map, Value};

use super::UNCATEGORIZED;

/// One keyword rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Keyword as written by the user (original case).
    pub keyword: String,
    /// Category assigned when the keyword matches.
    pub category: String,
    needle: String,
}

impl CategoryRule {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self {
            needle: keyword.to_lowercase(),
            keyword,
            category: category.into(),
        }
    }

    /// Whether the rule applies to an already lowercased merchant.
    fn matches(&self, merchant_lower: &str) -> bool {
        !self.needle.is_empty() && merchant_lower.contains(&self.needle)
    }
}

/// Keyword rules in insertion order. The first keyword found inside the
/// merchant text decides the category.
///
/// The set is append-only: existing keywords are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
    loaded: usize,
}

impl CategoryRuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(keyword, category)` pairs, treating them as loaded.
    pub fn from_pairs<K, C>(pairs: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: Into<String>,
        C: Into<String>,
    {
        let rules: Vec<CategoryRule> = pairs
            .into_iter()
            .map(|(k, c)| CategoryRule::new(k, c))
            .collect();
        let loaded = rules.len();
        Self { rules, loaded }
    }

    /// Parse a rule store document: a JSON object of keyword to category.
    /// Key order in the document is kept.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

        let map = match value {
            Value::Object(map) => map,
            other => return Err(format!("expected a JSON object, found {}", json_type(&other))),
        };

        let mut pairs = Vec::with_capacity(map.len());
        for (keyword, category) in map {
            match category {
                Value::String(category) => pairs.push((keyword, category)),
                other => {
                    return Err(format!(
                        "category for {keyword:?} must be a string, found {}",
                        json_type(&other)
                    ));
                }
            }
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Serialize as a JSON object with four-space indentation. Non-ASCII
    /// text is written as is.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut map = Map::with_capacity(self.rules.len());
        for rule in &self.rules {
            map.insert(rule.keyword.clone(), Value::String(rule.category.clone()));
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        map.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Category of the first rule whose keyword occurs in `merchant`
    /// (case-insensitive substring match), or `"Uncategorized"`.
    pub fn classify(&self, merchant: &str) -> &str {
        let merchant_lower = merchant.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&merchant_lower))
            .map(|rule| rule.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// The rule that decides `merchant`, if any.
    pub fn matching_rule(&self, merchant: &str) -> Option<&CategoryRule> {
        let merchant_lower = merchant.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&merchant_lower))
    }

    /// Append a rule after all existing ones.
    ///
    /// Returns `false` without changing anything when the keyword is blank
    /// or already present (case-insensitively).
    pub fn add_rule(&mut self, keyword: &str, category: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.contains_keyword(keyword) {
            return false;
        }
        self.rules.push(CategoryRule::new(keyword, category));
        true
    }

    /// Whether `keyword` is already registered (case-insensitive).
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.rules.iter().any(|rule| rule.needle == needle)
    }

    /// All rules in order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    /// Rules appended since the set was loaded.
    pub fn added(&self) -> &[CategoryRule] {
        &self.rules[self.loaded..]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
