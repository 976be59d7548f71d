//! Engine facade, injected clock, and the services it delegates to.

pub mod clock;
pub mod engine;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::LedgerEngine;
