use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    errors::LedgerError,
    ledger::{BudgetCategory, Entry, Ledger},
};

use super::{migrate, KeyValueStore, Result, BUDGET_KEY, ENTRIES_KEY};

/// Version written into every ledger document. Unversioned documents (bare
/// entry arrays) count as version 1.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Persisted form of the entry collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Persisted form of the budget categories and their ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub total_budget: i64,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
}

/// Outcome of loading the ledger documents from a store.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

/// Reads both ledger documents, upgrading older layouts in memory.
pub fn load_ledger(store: &dyn KeyValueStore) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    if let Some(raw) = store.get(ENTRIES_KEY)? {
        let entries = decode_entries(&raw, &mut report)?;
        report.ledger.entries = entries;
    }
    if let Some(raw) = store.get(BUDGET_KEY)? {
        let document = decode_budget(&raw)?;
        report.ledger.total_budget = document.total_budget;
        report.ledger.categories = document.categories;
    }
    check_invariants(&mut report);
    Ok(report)
}

/// Suffix appended to a key when an unreadable document is set aside.
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Copies every ledger document that fails to decode to `<key>.unreadable`,
/// so a fresh ledger can be written under the original key without losing it.
///
/// Returns the keys written.
pub fn preserve_unreadable(store: &dyn KeyValueStore) -> Result<Vec<String>> {
    let mut preserved = Vec::new();
    for key in [ENTRIES_KEY, BUDGET_KEY] {
        let Some(raw) = store.get(key)? else {
            continue;
        };
        let readable = if key == ENTRIES_KEY {
            decode_entries(&raw, &mut LoadReport::default()).is_ok()
        } else {
            decode_budget(&raw).is_ok()
        };
        if readable {
            continue;
        }
        let backup = format!("{key}{UNREADABLE_SUFFIX}");
        store.set(&backup, &raw)?;
        preserved.push(backup);
    }
    Ok(preserved)
}

pub fn save_entries(store: &dyn KeyValueStore, ledger: &Ledger) -> Result<()> {
    let document = EntriesDocument {
        schema_version: CURRENT_SCHEMA_VERSION,
        entries: ledger.entries.clone(),
    };
    store.set(ENTRIES_KEY, &serde_json::to_string_pretty(&document)?)
}

pub fn save_budget(store: &dyn KeyValueStore, ledger: &Ledger) -> Result<()> {
    let document = BudgetDocument {
        schema_version: CURRENT_SCHEMA_VERSION,
        total_budget: ledger.total_budget,
        categories: ledger.categories.clone(),
    };
    store.set(BUDGET_KEY, &serde_json::to_string_pretty(&document)?)
}

fn decode_entries(raw: &str, report: &mut LoadReport) -> Result<Vec<Entry>> {
    let value: Value = serde_json::from_str(raw)?;
    let (version, records) = match value {
        Value::Array(records) => (1, records),
        Value::Object(mut object) => {
            let version = document_version(&object)?;
            if version == CURRENT_SCHEMA_VERSION {
                let document: EntriesDocument = serde_json::from_value(Value::Object(object))?;
                return Ok(document.entries);
            }
            let records = match object.remove("entries") {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            };
            (version, records)
        }
        other => {
            return Err(LedgerError::Persistence(format!(
                "entries document has unexpected shape: {}",
                json_kind(&other)
            )))
        }
    };

    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match migrate::legacy_entry(record) {
            Ok(entry) => entries.push(entry),
            Err(reason) => report
                .warnings
                .push(format!("skipped legacy entry #{index}: {reason}")),
        }
    }
    report.migrations.push(format!(
        "entries: upgraded {} record(s) from schema v{version} to v{CURRENT_SCHEMA_VERSION}",
        entries.len()
    ));
    tracing::info!(
        from = version,
        to = CURRENT_SCHEMA_VERSION,
        migrated = entries.len(),
        "migrated entries document"
    );
    Ok(entries)
}

fn decode_budget(raw: &str) -> Result<BudgetDocument> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Object(object) => {
            document_version(&object)?;
            Ok(serde_json::from_value(Value::Object(object))?)
        }
        other => Err(LedgerError::Persistence(format!(
            "budget document has unexpected shape: {}",
            json_kind(&other)
        ))),
    }
}

fn document_version(object: &serde_json::Map<String, Value>) -> Result<u32> {
    let version = object
        .get("schema_version")
        .and_then(Value::as_u64)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));
    if version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::Persistence(format!(
            "document schema v{version} is newer than supported v{CURRENT_SCHEMA_VERSION}"
        )));
    }
    Ok(version)
}

fn check_invariants(report: &mut LoadReport) {
    let mut seen = HashSet::new();
    for entry in &mut report.ledger.entries {
        if !seen.insert(entry.id) {
            let fresh = Uuid::new_v4();
            report.warnings.push(format!(
                "entry {} had a duplicate id; reassigned {fresh}",
                entry.id
            ));
            entry.id = fresh;
            seen.insert(fresh);
        }
    }
    let before = report.ledger.entries.len();
    report.ledger.entries.retain(|entry| entry.amount > 0);
    let dropped = before - report.ledger.entries.len();
    if dropped > 0 {
        report
            .warnings
            .push(format!("dropped {dropped} entries with non-positive amounts"));
    }

    let allocated = report.ledger.allocated_total();
    if allocated > report.ledger.total_budget {
        report.warnings.push(format!(
            "category allocations ({allocated}) exceed the total budget ({})",
            report.ledger.total_budget
        ));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
