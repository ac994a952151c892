//! Migration of expense files written by older tooling.
//!
//! Older files carry `DD/MM/YY` (or `DD/MM/YYYY`) dates and no `month`/`year`
//! fields. Every record is kept as is, except that its date is rewritten to
//! ISO form and the two derived fields are set.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, StatementError};
use crate::statement::rules::{month_name, parse_legacy_date, year};

/// Records after migration plus the number dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationOutcome {
    pub records: Vec<Value>,
    /// Records without a usable date.
    pub skipped: usize,
}

/// Migrate a legacy document. The document must be a JSON array.
pub fn migrate_document(document: Value) -> Result<MigrationOutcome> {
    match document {
        Value::Array(records) => Ok(migrate_records(records)),
        _ => Err(StatementError::InvalidInput(
            "expected a JSON array of expense records".to_string(),
        )),
    }
}

/// Migrate each record, dropping those without a parsable date.
pub fn migrate_records(records: Vec<Value>) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();

    for record in records {
        match migrate_record(record) {
            Some(record) => outcome.records.push(record),
            None => outcome.skipped += 1,
        }
    }

    outcome
}

fn migrate_record(record: Value) -> Option<Value> {
    let Value::Object(mut fields) = record else {
        warn!("Skipping non-object record");
        return None;
    };

    let raw_date = match fields.get("date") {
        Some(Value::String(date)) if !date.is_empty() => date.clone(),
        _ => return None,
    };

    let Some(date) = parse_legacy_date(&raw_date) else {
        warn!(
            "Skipping invalid date: {} for merchant {}",
            raw_date,
            merchant_of(&fields)
        );
        return None;
    };

    fields.insert("date".to_string(), Value::String(date.format("%Y-%m-%d").to_string()));
    fields.insert("year".to_string(), Value::from(year(date)));
    fields.insert("month".to_string(), Value::String(month_name(date)));

    Some(Value::Object(fields))
}

fn merchant_of(fields: &Map<String, Value>) -> &str {
    fields
        .get("merchant")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
}
