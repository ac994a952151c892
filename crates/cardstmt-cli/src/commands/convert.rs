//! Convert command - turn one statement into categorized expense records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardstmt_core::categorize::{CategoryResolver, CategoryRuleEngine};
use cardstmt_core::models::expense::{Statement, StatementPage};
use cardstmt_core::pdf::{PageSource, PdfExtractor, TextPageSource};
use cardstmt_core::pipeline::Pipeline;
use cardstmt_core::statement::rules::format_amount;

use super::prompt::TerminalResolver;
use super::{to_json_pretty, LoadedConfig};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Statement file (PDF, or pre-extracted text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: expenses_converted.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Category rules file
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Ask for a category for every unknown merchant
    #[arg(short, long)]
    interactive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of expense records
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        eprintln!(
            "{} Statement file not found: {}",
            style("Error:").red().bold(),
            args.input.display()
        );
        return Ok(());
    }

    let loaded = LoadedConfig::load(config_path)?;
    let rules_path = loaded.rules_path(args.rules.as_deref());
    let output_path = args.output.clone().unwrap_or_else(|| loaded.config.output.path.clone());

    info!("Processing file: {}", args.input.display());

    let pages = read_pages(&args.input)?;

    let mut engine = CategoryRuleEngine::from_path(&rules_path)?;
    let pipeline = Pipeline::from_config(&loaded.config)?;

    let statement = if args.interactive {
        let mut resolver = TerminalResolver::stdio();
        pipeline.process_pages(&pages, &mut engine, Some(&mut resolver as &mut dyn CategoryResolver))?
    } else {
        pipeline.process_pages(&pages, &mut engine, None)?
    };

    let output = format_statement(&statement, args.format)?;
    fs::write(&output_path, output)?;

    print_summary(&statement, &output_path, &engine, &rules_path);
    debug!("Total processing time: {:?}", start.elapsed());

    if let Some(reason) = &statement.report.rules_persist_error {
        anyhow::bail!(
            "Expenses were saved, but {} new category rule(s) could not be written to {}: {}",
            statement.report.rules_added,
            rules_path.display(),
            reason
        );
    }
    Ok(())
}

/// Pages of a statement file, with a spinner while extracting.
pub fn read_pages(input: &Path) -> anyhow::Result<Vec<StatementPage>> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let pages = match extension.as_str() {
        "pdf" => {
            pb.set_message("Loading PDF...");
            let extractor = PdfExtractor::open(input)?;
            pb.set_message(format!("Extracting text from {} pages...", extractor.page_count()));
            extractor.pages()?
        }
        "txt" | "text" => {
            pb.set_message("Reading text...");
            TextPageSource::from_file(input)?.pages()?
        }
        _ => {
            pb.finish_and_clear();
            anyhow::bail!("Unsupported file format: {}", extension);
        }
    };

    pb.finish_and_clear();
    debug!("Read {} pages from {}", pages.len(), input.display());
    Ok(pages)
}

fn format_statement(statement: &Statement, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json_pretty(&statement.expenses),
        OutputFormat::Csv => format_csv(statement),
        OutputFormat::Text => Ok(format_text(statement)),
    }
}

fn format_csv(statement: &Statement) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "merchant", "amount", "category", "month", "year", "card"])?;

    for expense in &statement.expenses {
        wtr.write_record([
            &expense.date.to_string(),
            &expense.merchant,
            &expense.amount.to_string(),
            &expense.category,
            &expense.month,
            &expense.year.to_string(),
            &expense.card,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(statement: &Statement) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", statement.card));
    output.push_str(&format!("Transactions: {}\n\n", statement.expenses.len()));

    for expense in &statement.expenses {
        output.push_str(&format!(
            "{}  {:>12}  {:<20}  {}\n",
            expense.date,
            format_amount(expense.amount),
            expense.category,
            expense.merchant
        ));
    }

    output.push_str(&format!("\nTotal: {}\n", format_amount(statement.total())));
    output
}

fn print_summary(
    statement: &Statement,
    output_path: &Path,
    engine: &CategoryRuleEngine,
    rules_path: &Path,
) {
    let report = &statement.report;

    if report.rules_added > 0 && report.rules_persist_error.is_none() {
        println!(
            "{} Added {} new categorization rule(s)",
            style("✓").green(),
            report.rules_added
        );
        println!(
            "{} Updated category rules saved to {}",
            style("✓").green(),
            rules_path.display()
        );
    }

    println!(
        "{} Saved {} transactions to {}",
        style("✓").green(),
        statement.expenses.len(),
        output_path.display()
    );

    if report.dates_skipped > 0 {
        println!(
            "{} Skipped {} transaction(s) with invalid dates",
            style("ℹ").blue(),
            report.dates_skipped
        );
    }
    if report.invalid_amounts > 0 {
        println!(
            "{} Skipped {} line(s) with unparsable amounts",
            style("ℹ").blue(),
            report.invalid_amounts
        );
    }
    if report.non_positive > 0 {
        println!(
            "{} Skipped {} refund or zero-amount line(s)",
            style("ℹ").blue(),
            report.non_positive
        );
    }
    if report.interrupted {
        println!(
            "{} Interactive categorization stopped early after {} merchant(s)",
            style("⚠").yellow(),
            report.prompted
        );
    }
    if report.rules_store_missing && engine.new_rules().is_empty() {
        println!(
            "{} No category rules found at {}",
            style("⚠").yellow(),
            rules_path.display()
        );
    }
    if report.card_missing {
        println!("{} No card number found, using {}", style("⚠").yellow(), statement.card);
    }

    println!();
    println!(
        "Scanned {} lines on {} page(s): {} header/total, {} unrecognized",
        report.lines_scanned, report.pages, report.lines_excluded, report.lines_unmatched
    );
    println!("Extracted {} transactions", statement.expenses.len());
    println!("Skipped {} transaction(s) in total", report.total_skipped());
    println!("Uncategorized: {}", report.uncategorized);
    println!("Card: {}", statement.card);
    println!("Categories found:");
    for (category, count) in statement.category_counts() {
        println!("  {}: {}", category, count);
    }
}
