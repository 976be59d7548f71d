use chrono::NaiveDate;
use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::core::services::SummaryService;
use crate::currency::format_minor_units;
use crate::errors::LedgerError;
use crate::ledger::{Entry, Ledger, MonthKey};

use super::Result;

#[derive(Serialize)]
struct EntryRow<'a> {
    id: String,
    description: &'a str,
    amount: String,
    category: &'a str,
    group: &'a str,
    date: String,
}

impl<'a> From<&'a Entry> for EntryRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            description: &entry.description,
            amount: format_minor_units(entry.amount),
            category: &entry.category,
            group: entry.group.map_or("", |group| group.as_str()),
            date: entry.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Entries as CSV with header `id,description,amount,category,group,date`.
///
/// Amounts are written in major units with two decimals.
pub fn entries_csv(entries: &[Entry]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    if entries.is_empty() {
        writer.write_record(["id", "description", "amount", "category", "group", "date"])?;
    }
    for entry in entries {
        writer.serialize(EntryRow::from(entry))?;
    }
    finish(writer)
}

/// Summary report: the monthly series followed by this month's spending per
/// category, separated by a blank line.
pub fn report_csv(ledger: &Ledger, today: NaiveDate, months: u32) -> Result<String> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer.write_record(["month", "income", "expenses", "net"])?;
    for bucket in SummaryService::monthly_series(ledger, today, months) {
        writer.write_record([
            bucket.month.to_string(),
            format_minor_units(bucket.income),
            format_minor_units(bucket.expenses),
            format_minor_units(bucket.net()),
        ])?;
    }
    writer.write_record([""])?;

    let month = MonthKey::of(today);
    writer.write_record(["category", "spent"])?;
    for (category, amount) in SummaryService::category_totals_for_month(ledger, month) {
        writer.write_record([category, format_minor_units(amount)])?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| LedgerError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| LedgerError::Persistence(err.to_string()))
}
