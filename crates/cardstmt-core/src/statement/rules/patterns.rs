//! Literal tables and regex fragments for statement text.
//!
//! Hebrew literals are stored in the reversed character order produced by
//! the issuer's PDF text layer, which is the form the grammars match against.

use lazy_static::lazy_static;
use regex::Regex;

/// Regular domestic charge.
pub const REGULAR_FORMS: &[&str] = &["הליגר הקסע", "הקסע רגילה"];

/// Charge made abroad.
pub const FOREIGN_FORMS: &[&str] = &["ל\"וח לקייס", "ל\"חו לקייס"];

/// Installment charge. The statement prints this keyword twice per line.
pub const INSTALLMENT_FORMS: &[&str] = &["םימולשתב הקסע", "הליגר םימולשת תקסע"];

/// Header labels and running totals that share a line with amounts.
pub const EXCLUDED_MARKERS: &[&str] = &["בויח םוכס", "כ\"הס"];

/// Mastercard title marker.
pub const MASTERCARD_MARKER: &str = "דראקרטסמ";

/// Visa title marker.
pub const VISA_MARKER: &str = "הזיו";

/// Charge amount: thousands commas, optional sign, optional fraction.
pub const CHARGE_AMOUNT: &str = r"(?P<charge>-?[\d,]+\.?\d*)";

/// Original amount: same shape as the charge, unsigned.
pub const ORIGINAL_AMOUNT: &str = r"(?P<original>[\d,]+\.?\d*)";

/// Merchant text, as short as possible before the date.
pub const MERCHANT: &str = r"(?P<merchant>.+?)";

/// Statement date token (DD/MM/YY).
pub const SHORT_DATE: &str = r"(?P<date>\d{2}/\d{2}/\d{2})";

lazy_static! {
    /// Last four card digits next to a network marker in the statement title.
    pub static ref CARD_NUMBER: Regex = Regex::new(&format!(
        r"([0-9]{{4}})\s+(?:{}|{})",
        regex::escape(MASTERCARD_MARKER),
        regex::escape(VISA_MARKER)
    ))
    .unwrap();
}

/// Build a non-capturing alternation of escaped literals.
pub fn alternation<'a>(forms: impl IntoIterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = forms.into_iter().map(regex::escape).collect();
    format!("(?:{})", escaped.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_pattern() {
        let caps = CARD_NUMBER.captures("9334 דראקרטסמ ימואל סיטרכל").unwrap();
        assert_eq!(&caps[1], "9334");

        let caps = CARD_NUMBER.captures("1234 הזיו").unwrap();
        assert_eq!(&caps[1], "1234");
    }

    #[test]
    fn test_alternation_escapes_literals() {
        let pattern = alternation(["a.b", "c\"d"]);
        let re = Regex::new(&pattern).unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
        assert!(re.is_match("c\"d"));
    }
}
