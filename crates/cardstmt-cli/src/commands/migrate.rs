//! Migrate command - upgrade a legacy expense file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;

use cardstmt_core::legacy::migrate_document;

use super::{to_json_pretty, LoadedConfig};

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Legacy expense JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: expenses_v2.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: MigrateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let loaded = LoadedConfig::load(config_path)?;
    let output_path = args
        .output
        .unwrap_or_else(|| loaded.config.output.migrate_path.clone());

    println!("Reading from: {}", args.input.display());

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("The file '{}' was not found", args.input.display()))?;
    let document: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a valid JSON file", args.input.display()))?;

    let outcome = migrate_document(document)?;

    fs::write(&output_path, to_json_pretty(&outcome.records)?)?;

    println!(
        "{} {} transactions converted.",
        style("✓").green(),
        outcome.records.len()
    );
    if outcome.skipped > 0 {
        println!(
            "{} Skipped {} invalid entries.",
            style("ℹ").blue(),
            outcome.skipped
        );
    }
    println!("Saved new file to: {}", output_path.display());

    Ok(())
}
