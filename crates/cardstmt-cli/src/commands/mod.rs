//! CLI command implementations.

pub mod config;
pub mod convert;
pub mod inspect;
pub mod migrate;
pub mod prompt;
pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use cardstmt_core::models::config::StatementConfig;

/// `config.json` in the per-user configuration directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardstmt")
        .join("config.json")
}

/// Configuration loaded for a command, with the path it belongs to.
pub struct LoadedConfig {
    pub config: StatementConfig,
    pub path: PathBuf,
}

impl LoadedConfig {
    /// Load from `-c PATH` (must exist) or the default path (may be absent).
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                let config = StatementConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                Ok(Self { config, path })
            }
            None => {
                let path = default_config_path();
                let config = if path.exists() {
                    StatementConfig::from_file(&path)
                        .with_context(|| format!("Failed to load config from {}", path.display()))?
                } else {
                    StatementConfig::default()
                };
                Ok(Self { config, path })
            }
        }
    }

    /// Directory holding the config file and, by default, the rule store.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Rule store path: explicit flag, then `rules.path`, then next to the
    /// config file.
    pub fn rules_path(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.config.rules_path(self.dir()),
        }
    }
}

/// Serialize `value` as JSON with four-space indentation.
pub fn to_json_pretty<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}
