//! Terminal prompt for unknown merchants.

use std::io::{self, BufRead, Write};

use console::style;

use cardstmt_core::categorize::{CategoryResolver, Resolution};
use cardstmt_core::error::{Result, StatementError};

/// Asks the user to pick a category on a terminal.
pub struct TerminalResolver<R, W> {
    input: R,
    output: W,
}

impl TerminalResolver<io::StdinLock<'static>, io::Stdout> {
    /// Resolver bound to stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(StatementError::Resolver("input closed".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> CategoryResolver for TerminalResolver<R, W> {
    fn resolve(&mut self, merchant: &str, categories: &[String]) -> Result<Resolution> {
        writeln!(self.output)?;
        writeln!(self.output, "{} {}", style(">> New merchant:").cyan().bold(), merchant)?;
        writeln!(self.output, "Available categories:")?;
        for (i, category) in categories.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, category)?;
        }

        let category = loop {
            let choice = self.ask("\nSelect category number (or 's' to skip): ")?;
            if choice.eq_ignore_ascii_case("s") {
                return Ok(Resolution::Skip);
            }

            match choice.parse::<usize>() {
                Ok(n) if (1..=categories.len()).contains(&n) => break categories[n - 1].clone(),
                Ok(_) => writeln!(self.output, "Invalid choice. Try again.")?,
                Err(_) => writeln!(self.output, "Invalid input. Enter a number or 's' to skip.")?,
            }
        };

        writeln!(self.output, "{} Category: {}", style("✓").green(), category)?;
        let keyword = self.ask(&format!("Enter keyword to match (default: '{}'): ", merchant))?;

        Ok(Resolution::Assign {
            category,
            keyword: Some(keyword).filter(|k| !k.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        vec!["Groceries".to_string(), "Restaurants".to_string()]
    }

    fn resolve(input: &str) -> (Result<Resolution>, String) {
        let mut output = Vec::new();
        let result = TerminalResolver::new(input.as_bytes(), &mut output)
            .resolve("WOLT TLV", &categories());
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_select_with_default_keyword() {
        let (result, output) = resolve("2\n\n");
        assert_eq!(
            result.unwrap(),
            Resolution::Assign {
                category: "Restaurants".to_string(),
                keyword: None,
            }
        );
        assert!(output.contains("WOLT TLV"));
        assert!(output.contains("  1. Groceries"));
    }

    #[test]
    fn test_retry_until_valid_then_custom_keyword() {
        let (result, output) = resolve("9\nabc\n1\n wolt \n");
        assert_eq!(
            result.unwrap(),
            Resolution::Assign {
                category: "Groceries".to_string(),
                keyword: Some("wolt".to_string()),
            }
        );
        assert!(output.contains("Invalid choice"));
        assert!(output.contains("Invalid input"));
    }

    #[test]
    fn test_skip() {
        let (result, _) = resolve("S\n");
        assert_eq!(result.unwrap(), Resolution::Skip);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let (result, _) = resolve("");
        assert!(matches!(result, Err(StatementError::Resolver(_))));
    }
}
