use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    budget::BudgetCategory,
    entry::Entry,
    query::{EntryFilter, EntryQuery},
};

/// In-memory snapshot of every collection the engine owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Newest first.
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    /// Ceiling for the sum of category allocations, in minor units.
    #[serde(default)]
    pub total_budget: i64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry so the collection stays newest first.
    pub fn add_entry(&mut self, entry: Entry) -> Uuid {
        let id = entry.id;
        self.entries.insert(0, entry);
        id
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove_entry(&mut self, id: Uuid) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn query(&self, text: &str) -> EntryQuery<'_> {
        EntryQuery::new(&self.entries, EntryFilter::new(text))
    }

    pub fn add_category(&mut self, category: BudgetCategory) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn category(&self, id: Uuid) -> Option<&BudgetCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut BudgetCategory> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&BudgetCategory> {
        self.categories.iter().find(|category| category.matches(name))
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<BudgetCategory> {
        let index = self.categories.iter().position(|category| category.id == id)?;
        Some(self.categories.remove(index))
    }

    /// Sum of all category allocations.
    pub fn allocated_total(&self) -> i64 {
        self.categories
            .iter()
            .map(|category| category.allocated_amount)
            .fold(0, i64::saturating_add)
    }

    /// Expense total recorded against a budget category.
    pub fn spent_for(&self, category: &BudgetCategory) -> i64 {
        self.entries
            .iter()
            .filter(|entry| entry.is_expense() && category.matches(&entry.category))
            .map(|entry| entry.amount)
            .fold(0, i64::saturating_add)
    }
}
