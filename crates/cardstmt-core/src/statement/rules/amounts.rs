//! Amount normalization for statement lines.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount as printed on a statement line (e.g. "1,260.00", "-35.5").
///
/// Thousands commas are dropped and the sign is kept. Returns `None` when
/// nothing numeric is left.
pub fn parse_statement_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Format an amount with thousands separators and two decimals (1,260.00).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}
