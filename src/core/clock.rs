use chrono::{Local, NaiveDate};

/// Source of "today" for date defaults and month bucketing.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Real-time clock reading the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
