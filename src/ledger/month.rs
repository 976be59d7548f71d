use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar month bucket, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// The month `count` months before this one.
    pub fn months_back(self, count: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - count as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short month label such as `Jan`.
    pub fn short_label(self) -> String {
        self.first_day()
            .map(|day| day.format("%b").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_zero_padded() {
        let key = MonthKey::of(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!(key.short_label(), "Mar");
    }

    #[test]
    fn months_back_crosses_year_boundaries() {
        let jan = MonthKey { year: 2024, month: 1 };
        assert_eq!(jan.months_back(1), MonthKey { year: 2023, month: 12 });
        assert_eq!(jan.months_back(13), MonthKey { year: 2022, month: 12 });
        assert_eq!(jan.months_back(0), jan);
    }
}
