//! Page text sources.
//!
//! The pipeline only needs lines of text per page. [`PdfExtractor`] reads
//! them out of a statement PDF; [`TextPageSource`] serves text that was
//! extracted elsewhere, with pages separated by form feeds.

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::PdfExtractor;

use crate::error::Result;
use crate::models::expense::StatementPage;

/// Page separator in pre-extracted text.
pub const PAGE_BREAK: char = '\u{000C}';

/// Anything that can produce the pages of one statement.
pub trait PageSource {
    /// Pages in document order.
    fn pages(&self) -> Result<Vec<StatementPage>>;
}

impl PageSource for Vec<StatementPage> {
    fn pages(&self) -> Result<Vec<StatementPage>> {
        Ok(self.clone())
    }
}

/// Pre-extracted statement text.
#[derive(Debug, Clone, Default)]
pub struct TextPageSource {
    text: String,
}

impl TextPageSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a UTF-8 text file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl PageSource for TextPageSource {
    fn pages(&self) -> Result<Vec<StatementPage>> {
        Ok(self
            .text
            .split(PAGE_BREAK)
            .enumerate()
            .map(|(i, text)| StatementPage::from_text(i as u32 + 1, text))
            .collect())
    }
}
