//! Conversion of unversioned entry records into the current `Entry` shape.
//!
//! Three record layouts were written before documents carried a schema
//! version:
//! - transactions: string id, `type`, float amount in major units, ISO timestamp;
//! - expenses: numeric id, integer minor-unit amount, `group`, `YYYY-MM-DD` date;
//! - income: numeric id, integer minor-unit amount, `source`, `taxable`.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ledger::{group_for_category, BudgetGroup, Entry, EntryKind};

pub(crate) fn legacy_entry(value: &Value) -> Result<Entry, String> {
    let record = value
        .as_object()
        .ok_or_else(|| format!("expected an object, found `{value}`"))?;

    let typed = record.get("type").and_then(Value::as_str);
    let kind = match typed {
        Some(raw) => raw.parse::<EntryKind>()?,
        None if record.contains_key("source") => EntryKind::Income,
        None => EntryKind::Expense,
    };

    let amount = legacy_amount(record, typed.is_some())?;
    if amount <= 0 {
        return Err(format!("non-positive amount {amount}"));
    }

    let category = text_field(record, "category")
        .or_else(|| text_field(record, "source"))
        .unwrap_or_else(|| "Other".to_string());
    let description = text_field(record, "description").unwrap_or_else(|| match kind {
        EntryKind::Income => "Income".to_string(),
        EntryKind::Expense => "Expense".to_string(),
    });
    let date = legacy_date(record)?;

    let group = match kind {
        EntryKind::Income => None,
        EntryKind::Expense => Some(
            record
                .get("group")
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse::<BudgetGroup>().ok())
                .unwrap_or_else(|| group_for_category(&category)),
        ),
    };

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(Uuid::new_v4);

    Ok(Entry {
        id,
        description,
        amount,
        kind,
        category,
        group,
        date,
    })
}

/// Records carrying `type` stored major units as floats; the others stored
/// integer minor units.
fn legacy_amount(record: &Map<String, Value>, major_units: bool) -> Result<i64, String> {
    let raw = record
        .get("amount")
        .ok_or_else(|| "missing amount".to_string())?;
    if major_units {
        let value = raw
            .as_f64()
            .ok_or_else(|| format!("amount `{raw}` is not a number"))?;
        Ok((value * 100.0).round() as i64)
    } else if let Some(minor) = raw.as_i64() {
        Ok(minor)
    } else {
        raw.as_f64()
            .map(|value| value.round() as i64)
            .ok_or_else(|| format!("amount `{raw}` is not a number"))
    }
}

fn legacy_date(record: &Map<String, Value>) -> Result<NaiveDate, String> {
    let raw = record
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing date".to_string())?;
    parse_legacy_date(raw, &Local)
}

/// Calendar date of a legacy timestamp as seen in `zone`.
///
/// Zoned timestamps are converted first; plain dates and zone-less
/// timestamps keep their written date.
fn parse_legacy_date<Tz: TimeZone>(raw: &str, zone: &Tz) -> Result<NaiveDate, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(zone).date_naive());
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|err| format!("date `{raw}`: {err}"))
}

fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
