//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the cardstmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Category rule store configuration.
    pub rules: RulesConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Interactive categorization configuration.
    pub categorize: CategorizeConfig,

    /// Transaction line grammar configuration.
    pub parser: ParserConfig,
}

/// Category rule store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path to the rule store. When unset, `category_rules.json` next to the
    /// configuration file is used.
    pub path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output file for `convert`.
    pub path: PathBuf,

    /// Default output file for `migrate`.
    pub migrate_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("expenses_converted.json"),
            migrate_path: PathBuf::from("expenses_v2.json"),
        }
    }
}

/// Interactive categorization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeConfig {
    /// Categories offered when resolving an unknown merchant.
    pub categories: Vec<String>,
}

impl Default for CategorizeConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

/// Standard expense categories.
pub fn default_categories() -> Vec<String> {
    [
        "Groceries",
        "Restaurants",
        "Food Delivery",
        "Transportation",
        "Shopping",
        "Technology",
        "Entertainment",
        "Telecommunications",
        "Insurance",
        "Banking Fees",
        "Healthcare",
        "Utilities",
        "General Services",
        "Other",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// Extra literals for the transaction line grammars.
///
/// Surface forms are written exactly as they appear in the extracted text,
/// which for right-to-left statements is usually reversed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Additional surface forms of the regular charge keyword.
    pub regular_forms: Vec<String>,

    /// Additional surface forms of the foreign charge keyword.
    pub foreign_forms: Vec<String>,

    /// Additional surface forms of the installment keyword.
    pub installment_forms: Vec<String>,

    /// Additional header/footer markers; lines containing one are skipped.
    pub excluded_markers: Vec<String>,
}

impl StatementConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Resolve the rule store path, falling back to `category_rules.json`
    /// inside `config_dir`.
    pub fn rules_path(&self, config_dir: &std::path::Path) -> PathBuf {
        self.rules
            .path
            .clone()
            .unwrap_or_else(|| config_dir.join("category_rules.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StatementConfig =
            serde_json::from_str(r#"{"parser": {"excluded_markers": ["total"]}}"#).unwrap();

        assert_eq!(config.parser.excluded_markers, vec!["total"]);
        assert_eq!(config.categorize.categories.len(), 14);
        assert_eq!(config.output.path, PathBuf::from("expenses_converted.json"));
        assert!(config.rules.path.is_none());
    }

    #[test]
    fn test_rules_path_fallback() {
        let mut config = StatementConfig::default();
        assert_eq!(
            config.rules_path(std::path::Path::new("/etc/cardstmt")),
            PathBuf::from("/etc/cardstmt/category_rules.json")
        );

        config.rules.path = Some(PathBuf::from("mine.json"));
        assert_eq!(
            config.rules_path(std::path::Path::new("/etc/cardstmt")),
            PathBuf::from("mine.json")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StatementConfig::default();
        config.parser.regular_forms.push("רגיל".to_string());
        config.save(&path).unwrap();

        let loaded = StatementConfig::from_file(&path).unwrap();
        assert_eq!(loaded.parser.regular_forms, vec!["רגיל"]);
    }
}
