//! Card number extraction from the statement title.

use regex::Regex;

use super::patterns::CARD_NUMBER;
use super::FieldExtractor;
use crate::models::expense::StatementPage;

/// Card identifier used when the statement does not show one.
pub const PLACEHOLDER_CARD: &str = "0000";

/// Finds the last four card digits printed next to the network name.
#[derive(Debug, Clone)]
pub struct CardNumberExtractor {
    pattern: Regex,
}

impl CardNumberExtractor {
    pub fn new() -> Self {
        Self {
            pattern: CARD_NUMBER.clone(),
        }
    }

    /// Card digits from the first page, or [`PLACEHOLDER_CARD`].
    pub fn card_for(&self, pages: &[StatementPage]) -> String {
        pages
            .first()
            .and_then(|page| self.extract(&page.text()))
            .unwrap_or_else(|| PLACEHOLDER_CARD.to_string())
    }
}

impl Default for CardNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CardNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern.captures(text).map(|caps| caps[1].to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(text: &str) -> StatementPage {
        StatementPage::from_text(1, text)
    }

    #[test]
    fn test_mastercard_title() {
        let pages = vec![page("ימואל\n9334 דראקרטסמ ימואל סיטרכל\n10.00 ...")];
        assert_eq!(CardNumberExtractor::new().card_for(&pages), "9334");
    }

    #[test]
    fn test_visa_title() {
        let pages = vec![page("4580 הזיו סיטרכ")];
        assert_eq!(CardNumberExtractor::new().card_for(&pages), "4580");
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = CardNumberExtractor::new();
        assert_eq!(
            extractor.extract("1111 הזיו then 2222 דראקרטסמ"),
            Some("1111".to_string())
        );
        assert_eq!(
            extractor.extract_all("1111 הזיו then 2222 דראקרטסמ"),
            vec!["1111", "2222"]
        );
    }

    #[test]
    fn test_only_first_page_is_searched() {
        let pages = vec![page("no title here"), page("9334 דראקרטסמ")];
        assert_eq!(CardNumberExtractor::new().card_for(&pages), PLACEHOLDER_CARD);
    }

    #[test]
    fn test_placeholder_without_pages_or_marker() {
        let extractor = CardNumberExtractor::new();
        assert_eq!(extractor.card_for(&[]), PLACEHOLDER_CARD);
        assert_eq!(extractor.card_for(&[page("9334 Mastercard")]), PLACEHOLDER_CARD);
    }
}
