//! Transaction line recognition.
//!
//! Two grammars are tried in order on every raw extracted line:
//!
//! ```text
//! single-charge:  charge  KIND  original  merchant  DD/MM/YY
//! installment:    charge  INST  INST  original  merchant  DD/MM/YY
//! ```
//!
//! `KIND` is any regular or foreign surface form, `INST` any installment
//! surface form (the issuer's column layout prints it twice). Matching runs
//! on the raw line; only the captured merchant is display-order corrected.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::parse_statement_amount;
use super::bidi;
use super::patterns::{
    alternation, CHARGE_AMOUNT, EXCLUDED_MARKERS, FOREIGN_FORMS, INSTALLMENT_FORMS, MERCHANT,
    ORIGINAL_AMOUNT, REGULAR_FORMS, SHORT_DATE,
};
use crate::error::Result;
use crate::models::config::ParserConfig;
use crate::models::expense::RawTransaction;

/// Recognized transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Regular domestic charge.
    Regular,
    /// Charge made abroad.
    Foreign,
    /// One monthly payment of an installment purchase.
    Installment,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Regular,
        TransactionKind::Foreign,
        TransactionKind::Installment,
    ];

    /// Surface forms known out of the box.
    pub fn builtin_forms(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Regular => REGULAR_FORMS,
            TransactionKind::Foreign => FOREIGN_FORMS,
            TransactionKind::Installment => INSTALLMENT_FORMS,
        }
    }

    /// Whether lines of this kind use the doubled-keyword grammar.
    pub fn is_installment(self) -> bool {
        matches!(self, TransactionKind::Installment)
    }
}

/// Surface forms per transaction kind plus header/footer markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    forms: Vec<(TransactionKind, String)>,
    excluded: Vec<String>,
}

impl KeywordTable {
    /// An empty table. Nothing matches until forms are added.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in surface forms and markers.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for kind in TransactionKind::ALL {
            for form in kind.builtin_forms() {
                table.add_form(kind, *form);
            }
        }
        for marker in EXCLUDED_MARKERS {
            table.add_excluded_marker(*marker);
        }
        table
    }

    /// The built-in table extended with the forms and markers from `config`.
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut table = Self::builtin();
        for form in &config.regular_forms {
            table.add_form(TransactionKind::Regular, form.as_str());
        }
        for form in &config.foreign_forms {
            table.add_form(TransactionKind::Foreign, form.as_str());
        }
        for form in &config.installment_forms {
            table.add_form(TransactionKind::Installment, form.as_str());
        }
        for marker in &config.excluded_markers {
            table.add_excluded_marker(marker.as_str());
        }
        table
    }

    /// Register a surface form. Blank and already-known forms are ignored.
    pub fn add_form(&mut self, kind: TransactionKind, form: impl Into<String>) {
        let form = form.into();
        let form = form.trim();
        if form.is_empty() || self.forms.iter().any(|(k, f)| *k == kind && f == form) {
            return;
        }
        self.forms.push((kind, form.to_string()));
    }

    /// Builder-style [`KeywordTable::add_form`].
    pub fn with_form(mut self, kind: TransactionKind, form: impl Into<String>) -> Self {
        self.add_form(kind, form);
        self
    }

    /// Register a header/footer marker.
    pub fn add_excluded_marker(&mut self, marker: impl Into<String>) {
        let marker = marker.into();
        if marker.is_empty() || self.excluded.contains(&marker) {
            return;
        }
        self.excluded.push(marker);
    }

    /// Builder-style [`KeywordTable::add_excluded_marker`].
    pub fn with_excluded_marker(mut self, marker: impl Into<String>) -> Self {
        self.add_excluded_marker(marker);
        self
    }

    /// Surface forms of `kind`, in registration order.
    pub fn forms(&self, kind: TransactionKind) -> impl Iterator<Item = &str> {
        self.forms
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, f)| f.as_str())
    }

    /// Kind of a matched keyword literal.
    pub fn kind_of(&self, keyword: &str) -> Option<TransactionKind> {
        self.forms
            .iter()
            .find(|(_, f)| f == keyword)
            .map(|(k, _)| *k)
    }

    /// Whether `line` carries a header/footer marker.
    pub fn is_excluded(&self, line: &str) -> bool {
        self.excluded.iter().any(|m| line.contains(m.as_str()))
    }

    fn single_charge_forms(&self) -> impl Iterator<Item = &str> {
        self.forms
            .iter()
            .filter(|(k, _)| !k.is_installment())
            .map(|(_, f)| f.as_str())
    }
}

/// What happened to one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line encodes a positive charge.
    Transaction(RawTransaction),
    /// The line carries a header/footer marker.
    Excluded,
    /// Neither grammar matched.
    NoMatch,
    /// A grammar matched but the charge amount is not a number.
    InvalidAmount,
    /// A grammar matched but the charge is zero or negative (waived fee or
    /// refund).
    NonPositive,
}

impl LineOutcome {
    /// The transaction, if the line produced one.
    pub fn into_transaction(self) -> Option<RawTransaction> {
        match self {
            LineOutcome::Transaction(tx) => Some(tx),
            _ => None,
        }
    }
}

lazy_static! {
    static ref BUILTIN_MATCHER: TransactionLineMatcher =
        TransactionLineMatcher::new(KeywordTable::builtin()).unwrap();
}

/// Recognizes transaction records in raw statement lines.
#[derive(Debug, Clone)]
pub struct TransactionLineMatcher {
    table: KeywordTable,
    single_charge: Option<Regex>,
    installment: Option<Regex>,
}

impl TransactionLineMatcher {
    /// Compile both grammars from `table`. A grammar whose keyword set is
    /// empty never matches.
    pub fn new(table: KeywordTable) -> Result<Self> {
        let single_charge = compile_grammar(table.single_charge_forms().collect(), 1)?;
        let installment = compile_grammar(table.forms(TransactionKind::Installment).collect(), 2)?;

        Ok(Self {
            table,
            single_charge,
            installment,
        })
    }

    /// Matcher with the built-in keyword table.
    pub fn builtin() -> Self {
        BUILTIN_MATCHER.clone()
    }

    /// The keyword table the grammars were built from.
    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Classify one raw line.
    pub fn match_line(&self, line: &str) -> LineOutcome {
        if self.table.is_excluded(line) {
            return LineOutcome::Excluded;
        }

        let (caps, kind) = match self.captures(line) {
            Some(found) => found,
            None => return LineOutcome::NoMatch,
        };

        let amount = match parse_statement_amount(&caps["charge"]) {
            Some(amount) => amount,
            None => {
                trace!("Unparsable charge amount {:?} in line {:?}", &caps["charge"], line);
                return LineOutcome::InvalidAmount;
            }
        };

        if amount <= Decimal::ZERO {
            trace!("Skipping non-positive charge {} in line {:?}", amount, line);
            return LineOutcome::NonPositive;
        }

        LineOutcome::Transaction(RawTransaction {
            raw_date: caps["date"].to_string(),
            merchant: bidi::normalize(caps["merchant"].trim()),
            amount,
            original_amount: parse_statement_amount(&caps["original"]),
            kind,
        })
    }

    fn captures<'t>(&self, line: &'t str) -> Option<(Captures<'t>, TransactionKind)> {
        if let Some(caps) = self.single_charge.as_ref().and_then(|re| re.captures(line)) {
            let kind = caps
                .name("keyword")
                .and_then(|m| self.table.kind_of(m.as_str()))
                .unwrap_or(TransactionKind::Regular);
            return Some((caps, kind));
        }

        self.installment
            .as_ref()
            .and_then(|re| re.captures(line))
            .map(|caps| (caps, TransactionKind::Installment))
    }
}

impl Default for TransactionLineMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Build `charge (KEYWORD){repeats} original merchant date`.
fn compile_grammar(forms: Vec<&str>, repeats: usize) -> Result<Option<Regex>> {
    if forms.is_empty() {
        return Ok(None);
    }

    let keywords = alternation(forms);
    let mut pattern = format!(r"{}\s+", CHARGE_AMOUNT);
    if repeats == 1 {
        pattern.push_str(&format!(r"(?P<keyword>{})\s+", keywords));
    } else {
        for _ in 0..repeats {
            pattern.push_str(&format!(r"{}\s+", keywords));
        }
    }
    pattern.push_str(&format!(r"{}\s+{}\s+{}", ORIGINAL_AMOUNT, MERCHANT, SHORT_DATE));

    Ok(Some(Regex::new(&pattern)?))
}
