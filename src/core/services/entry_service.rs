//! Business logic helpers for managing entries.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{require_positive, require_text, ServiceResult};
use crate::ledger::{Entry, EntryPatch, Ledger, NewEntry};

/// Provides validated CRUD helpers for ledger entries.
pub struct EntryService;

impl EntryService {
    /// Validates and prepends a new entry, returning its identifier.
    pub fn add(ledger: &mut Ledger, entry: NewEntry, today: NaiveDate) -> ServiceResult<Uuid> {
        require_text("Description", &entry.description)?;
        require_text("Category", &entry.category)?;
        require_positive(entry.amount)?;
        let NewEntry {
            description,
            amount,
            kind,
            category,
            date,
        } = entry;
        let entry = Entry::new(
            description.trim(),
            amount,
            kind,
            category.trim(),
            date.unwrap_or(today),
        );
        Ok(ledger.add_entry(entry))
    }

    /// Merges `patch` into the entry identified by `id`.
    ///
    /// Returns `Ok(false)` without touching the ledger when the id is unknown
    /// or the patch carries no fields.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: EntryPatch) -> ServiceResult<bool> {
        if let Some(description) = patch.description.as_deref() {
            require_text("Description", description)?;
        }
        if let Some(category) = patch.category.as_deref() {
            require_text("Category", category)?;
        }
        if let Some(amount) = patch.amount {
            require_positive(amount)?;
        }
        if patch.is_empty() {
            return Ok(false);
        }
        match ledger.entry_mut(id) {
            Some(entry) => {
                entry.apply(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the entry identified by `id`, returning it when present.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Option<Entry> {
        ledger.remove_entry(id)
    }

    /// Returns a snapshot of the ledger's entries, newest first.
    pub fn list(ledger: &Ledger) -> Vec<&Entry> {
        ledger.entries.iter().collect()
    }
}
