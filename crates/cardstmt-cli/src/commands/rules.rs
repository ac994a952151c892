//! Rules command - inspect and extend the category rule store.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use cardstmt_core::categorize::CategoryRuleEngine;

use super::LoadedConfig;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Category rules file
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List rules in match order
    List,

    /// Append a rule
    Add {
        /// Keyword to look for in merchant names (case-insensitive)
        keyword: String,
        /// Category to assign
        category: String,
    },

    /// Show which category a merchant would get
    Classify {
        /// Merchant name
        merchant: String,
    },
}

pub fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let loaded = LoadedConfig::load(config_path)?;
    let rules_path = loaded.rules_path(args.rules.as_deref());
    let mut engine = CategoryRuleEngine::from_path(&rules_path)?;

    match args.command {
        RulesCommand::List => {
            if engine.rules().is_empty() {
                println!("No category rules in {}", rules_path.display());
                return Ok(());
            }
            for (i, rule) in engine.rules().iter().enumerate() {
                println!("{:>4}. {} -> {}", i + 1, rule.keyword, rule.category);
            }
        }
        RulesCommand::Add { keyword, category } => {
            if !loaded.config.categorize.categories.contains(&category) {
                println!(
                    "{} '{}' is not one of the configured categories",
                    style("⚠").yellow(),
                    category
                );
            }
            if !engine.add_rule(&keyword, &category) {
                anyhow::bail!("A rule for keyword '{}' already exists (or keyword is blank)", keyword);
            }
            engine.persist()?;
            println!(
                "{} Added {} -> {} to {}",
                style("✓").green(),
                keyword.trim(),
                category,
                rules_path.display()
            );
        }
        RulesCommand::Classify { merchant } => match engine.rules().matching_rule(&merchant) {
            Some(rule) => println!("{} (keyword: {})", rule.category, rule.keyword),
            None => println!("{}", engine.classify(&merchant)),
        },
    }

    Ok(())
}
