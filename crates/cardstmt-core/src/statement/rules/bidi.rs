//! Display-order repair for right-to-left text segments.
//!
//! The issuer's PDF text layer stores Hebrew runs with their characters in
//! reverse order. A segment that contains any Hebrew character is reversed
//! as a whole; segments without one are returned untouched.
//!
//! Whole-segment reversal also reverses Latin and digit runs embedded in a
//! Hebrew segment ("ZARA קניון" comes out with "ARAZ"). Downstream rules
//! are written against that output, so the behavior is kept as is.

/// First and last code point of the Hebrew block.
const RTL_RANGE: std::ops::RangeInclusive<char> = '\u{0590}'..='\u{05FF}';

/// Whether `c` belongs to the right-to-left script range.
pub fn is_rtl(c: char) -> bool {
    RTL_RANGE.contains(&c)
}

/// Whether `text` contains at least one right-to-left character.
pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(is_rtl)
}

/// Return `text` in display order.
pub fn normalize(text: &str) -> String {
    if !contains_rtl(text) {
        return text.to_string();
    }
    text.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latin_is_untouched() {
        assert_eq!(normalize("WOLT TEL AVIV 123"), "WOLT TEL AVIV 123");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_hebrew_is_reversed() {
        assert_eq!(normalize("לפוש"), "שופל");
        assert_eq!(normalize("רפוס םראפ"), "פארם סופר");
    }

    #[test]
    fn test_pure_hebrew_is_self_inverse() {
        for s in ["הקסע", "ימואל סיטרכל", "א", "םימולשתב הקסע"] {
            assert_eq!(normalize(&normalize(s)), s);
        }
    }

    #[test]
    fn test_mixed_segment_reverses_everything() {
        assert_eq!(normalize("ןוינק ZARA"), "ARAZ קניון");
        assert_eq!(normalize("!הלאוו 12"), "21 וואלה!");
    }

    #[test]
    fn test_contains_rtl() {
        assert!(contains_rtl("abc ש"));
        assert!(!contains_rtl("abc 123 !"));
    }
}
