//! Key-value persistence: the store abstraction, its backends, and the
//! versioned documents written through it.

pub mod documents;
pub mod json_backend;
pub mod memory;
mod migrate;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key holding the entry collection.
pub const ENTRIES_KEY: &str = "wise_ledger_entries";
/// Key holding budget categories and the total-budget ceiling.
pub const BUDGET_KEY: &str = "wise_ledger_budget";
/// Key holding user settings.
pub const SETTINGS_KEY: &str = "wise_ledger_settings";
/// Key holding the user profile.
pub const PROFILE_KEY: &str = "wise_ledger_profile";

/// Abstraction over string key-value backends holding one JSON document per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use documents::{
    load_ledger, preserve_unreadable, save_budget, save_entries, BudgetDocument, EntriesDocument,
    LoadReport, CURRENT_SCHEMA_VERSION, UNREADABLE_SUFFIX,
};
pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
