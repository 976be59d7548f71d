//! CSV and HTML renderings of the ledger.

pub mod csv;
pub mod html;

pub use self::csv::{entries_csv, report_csv};
pub use html::report_html;

pub type Result<T> = std::result::Result<T, crate::errors::LedgerError>;
