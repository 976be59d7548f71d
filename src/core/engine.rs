use std::collections::BTreeMap;

use uuid::Uuid;

use crate::core::clock::{Clock, SystemClock};
use crate::core::services::{
    BudgetOverview, BudgetService, CategoryStatus, DerivedTotals, EntryService, GroupTotals,
    RuleBreakdown, SummaryService,
};
use crate::errors::LedgerError;
use crate::ledger::{
    BudgetCategory, BudgetCategoryPatch, Entry, EntryPatch, EntryQuery, Ledger,
    NewBudgetCategory, NewEntry,
};
use crate::storage::{self, KeyValueStore, LoadReport};

type Result<T> = std::result::Result<T, LedgerError>;

/// Facade that owns the ledger snapshot, its store, and the clock.
///
/// Every accepted mutation writes the affected document back to the store.
/// Write failures are logged and swallowed; the in-memory snapshot stays
/// authoritative and the next mutation writes it again.
pub struct LedgerEngine {
    ledger: Ledger,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    /// Set when unreadable documents could not be set aside; writes are skipped.
    read_only: bool,
}

impl LedgerEngine {
    /// Loads the persisted documents, migrating older layouts.
    pub fn open(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Result<(Self, LoadReport)> {
        let report = storage::load_ledger(store.as_ref())?;
        for warning in &report.warnings {
            tracing::warn!(%warning, "ledger load warning");
        }
        tracing::info!(
            entries = report.ledger.entries.len(),
            categories = report.ledger.categories.len(),
            "ledger opened"
        );
        let engine = Self {
            ledger: report.ledger.clone(),
            store,
            clock,
            read_only: false,
        };
        Ok((engine, report))
    }

    /// Like [`LedgerEngine::open`], but starts empty when loading fails.
    ///
    /// Undecodable documents are first copied aside; if that fails the engine
    /// is read-only so they are never overwritten.
    pub fn open_or_default(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        match storage::load_ledger(store.as_ref()) {
            Ok(report) => {
                for warning in &report.warnings {
                    tracing::warn!(%warning, "ledger load warning");
                }
                Self {
                    ledger: report.ledger,
                    store,
                    clock,
                    read_only: false,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load ledger; starting empty");
                let read_only = match storage::preserve_unreadable(store.as_ref()) {
                    Ok(preserved) => {
                        for key in &preserved {
                            tracing::warn!(%key, "unreadable document set aside");
                        }
                        false
                    }
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            "could not set aside unreadable documents; changes will not be saved"
                        );
                        true
                    }
                };
                Self {
                    ledger: Ledger::new(),
                    store,
                    clock,
                    read_only,
                }
            }
        }
    }

    /// Engine over the given store using the system clock.
    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self::open_or_default(store, Box::new(SystemClock))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[Entry] {
        &self.ledger.entries
    }

    pub fn categories(&self) -> &[BudgetCategory] {
        &self.ledger.categories
    }

    pub fn total_budget(&self) -> i64 {
        self.ledger.total_budget
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.ledger.entry(id)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Whether mutations stay in memory only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn add(&mut self, entry: NewEntry) -> Result<Uuid> {
        let id = EntryService::add(&mut self.ledger, entry, self.clock.today())?;
        tracing::debug!(%id, "entry added");
        self.persist_entries();
        Ok(id)
    }

    pub fn update(&mut self, id: Uuid, patch: EntryPatch) -> Result<bool> {
        let changed = EntryService::update(&mut self.ledger, id, patch)?;
        if changed {
            tracing::debug!(%id, "entry updated");
            self.persist_entries();
        }
        Ok(changed)
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        match EntryService::remove(&mut self.ledger, id) {
            Some(_) => {
                tracing::debug!(%id, "entry deleted");
                self.persist_entries();
                true
            }
            None => false,
        }
    }

    pub fn query(&self, filter: &str) -> EntryQuery<'_> {
        self.ledger.query(filter)
    }

    pub fn totals(&self) -> DerivedTotals {
        SummaryService::totals(&self.ledger, self.clock.today())
    }

    pub fn category_totals(&self) -> BTreeMap<String, i64> {
        SummaryService::category_totals(&self.ledger)
    }

    pub fn group_totals(&self) -> GroupTotals {
        SummaryService::group_totals(&self.ledger)
    }

    pub fn rule_breakdown(&self) -> RuleBreakdown {
        BudgetService::rule_breakdown(&self.ledger)
    }

    pub fn add_category(&mut self, category: NewBudgetCategory) -> Result<Uuid> {
        let id = BudgetService::add_category(&mut self.ledger, category)?;
        tracing::debug!(%id, "budget category added");
        self.persist_budget();
        Ok(id)
    }

    pub fn edit_category(&mut self, id: Uuid, patch: BudgetCategoryPatch) -> Result<bool> {
        let changed = BudgetService::edit_category(&mut self.ledger, id, patch)?;
        if changed {
            tracing::debug!(%id, "budget category updated");
            self.persist_budget();
        }
        Ok(changed)
    }

    pub fn remove_category(&mut self, id: Uuid) -> bool {
        match BudgetService::remove_category(&mut self.ledger, id) {
            Some(_) => {
                tracing::debug!(%id, "budget category removed");
                self.persist_budget();
                true
            }
            None => false,
        }
    }

    pub fn set_total_budget(&mut self, amount: i64) -> Result<()> {
        BudgetService::set_total_budget(&mut self.ledger, amount)?;
        tracing::debug!(amount, "total budget set");
        self.persist_budget();
        Ok(())
    }

    pub fn category_statuses(&self) -> Vec<CategoryStatus> {
        BudgetService::category_statuses(&self.ledger)
    }

    pub fn budget_overview(&self) -> BudgetOverview {
        BudgetService::overview(&self.ledger)
    }

    fn persist_entries(&self) {
        if self.read_only {
            tracing::warn!("read-only ledger; entries not saved");
            return;
        }
        if let Err(err) = storage::save_entries(self.store.as_ref(), &self.ledger) {
            tracing::warn!(error = %err, "failed to persist entries");
        }
    }

    fn persist_budget(&self) {
        if self.read_only {
            tracing::warn!("read-only ledger; budget not saved");
            return;
        }
        if let Err(err) = storage::save_budget(self.store.as_ref(), &self.ledger) {
            tracing::warn!(error = %err, "failed to persist budget");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::errors::ValidationError;
    use crate::storage::{MemoryStore, BUDGET_KEY, ENTRIES_KEY, UNREADABLE_SUFFIX};
    use chrono::NaiveDate;

    fn engine_on(store: MemoryStore) -> LedgerEngine {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        LedgerEngine::open_or_default(Box::new(store), Box::new(clock))
    }

    #[test]
    fn mutations_are_written_to_the_store() {
        let store = MemoryStore::new();
        let mut engine = engine_on(store.clone());
        let id = engine.add(NewEntry::income("Pay", 100, "Salary")).unwrap();
        assert!(store.get(ENTRIES_KEY).unwrap().unwrap().contains(&id.to_string()));

        let reopened = engine_on(store);
        assert_eq!(reopened.entries(), engine.entries());
    }

    #[test]
    fn validation_errors_surface_without_persisting() {
        let store = MemoryStore::new();
        let mut engine = engine_on(store.clone());
        let err = engine.add(NewEntry::expense("Rent", 0, "Housing")).unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::NonPositiveAmount));
        assert!(store.is_empty());
    }

    #[test]
    fn default_date_comes_from_the_clock() {
        let mut engine = engine_on(MemoryStore::new());
        let id = engine.add(NewEntry::expense("Bus", 250, "Transportation")).unwrap();
        assert_eq!(engine.entry(id).unwrap().date, engine.today());
    }

    /// Memory store that refuses to write backup keys.
    struct NoBackupStore(MemoryStore);

    impl KeyValueStore for NoBackupStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key.ends_with(UNREADABLE_SUFFIX) {
                return Err(LedgerError::Persistence(format!("cannot write {key}")));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn unreadable_documents_are_set_aside_before_overwrite() {
        let raw = r#"{"schema_version": 3, "entries": [{"precious": true}]}"#;
        let store = MemoryStore::with_value(ENTRIES_KEY, raw);
        let mut engine = engine_on(store.clone());
        assert!(!engine.is_read_only());

        engine.add(NewEntry::income("Pay", 100, "Salary")).unwrap();
        let backup = format!("{ENTRIES_KEY}{UNREADABLE_SUFFIX}");
        assert_eq!(store.get(&backup).unwrap().as_deref(), Some(raw));
        assert!(store.get(ENTRIES_KEY).unwrap().unwrap().contains("Pay"));
    }

    #[test]
    fn engine_stays_read_only_when_backup_fails() {
        let raw = r#"{"schema_version": 3, "entries": []}"#;
        let inner = MemoryStore::with_value(ENTRIES_KEY, raw);
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let mut engine =
            LedgerEngine::open_or_default(Box::new(NoBackupStore(inner.clone())), Box::new(clock));
        assert!(engine.is_read_only());

        engine.add(NewEntry::income("Pay", 100, "Salary")).unwrap();
        engine.set_total_budget(1_000).unwrap();
        assert_eq!(engine.entries().len(), 1);
        assert_eq!(inner.get(ENTRIES_KEY).unwrap().as_deref(), Some(raw));
        assert_eq!(inner.get(BUDGET_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_documents_start_empty() {
        let store = MemoryStore::with_value(ENTRIES_KEY, "{not json");
        let engine = engine_on(store.clone());
        assert!(engine.entries().is_empty());
        assert!(LedgerEngine::open(Box::new(store), Box::new(SystemClock)).is_err());
    }
}
