//! Ledger domain models, persistence-friendly types, and helpers.

pub mod budget;
pub mod entry;
pub mod group;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod month;
pub mod query;

pub use budget::{BudgetCategory, BudgetCategoryPatch, NewBudgetCategory};
pub use entry::{Entry, EntryKind, EntryPatch, NewEntry};
pub use group::{group_for_category, known_expense_categories, BudgetGroup};
pub use ledger::Ledger;
pub use month::MonthKey;
pub use query::{EntryFilter, EntryQuery};
