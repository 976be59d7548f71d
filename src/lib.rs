#![doc(test(attr(deny(warnings))))]

//! Wise Ledger is a personal finance engine: income and expense entries,
//! budget categories under a 50/30/20 rule, derived totals, tax estimates,
//! and CSV/HTML reports, persisted as versioned JSON documents.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{Clock, FixedClock, LedgerEngine, SystemClock};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Wise Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
