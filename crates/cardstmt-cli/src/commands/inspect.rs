//! Inspect command - dump raw page text to study a statement layout.

use std::path::PathBuf;

use clap::Args;
use console::style;

use super::convert::read_pages;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Statement file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Number of pages to show
    #[arg(long, default_value_t = 2)]
    pages: usize,

    /// Characters to show per page
    #[arg(long, default_value_t = 2000)]
    chars: usize,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pages = read_pages(&args.input)?;
    println!("Total pages: {}", pages.len());

    let rule = "=".repeat(60);
    for page in pages.iter().take(args.pages) {
        println!();
        println!("{}", rule);
        println!("{}", style(format!("PAGE {}", page.number)).bold());
        println!("{}", rule);

        let text: String = page.text().chars().take(args.chars).collect();
        if text.trim().is_empty() {
            println!("{}", style("(no text)").dim());
        } else {
            println!("\n--- RAW TEXT (first {} chars) ---", args.chars);
            println!("{}", text);
        }
    }

    Ok(())
}
