use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::{group_for_category, BudgetGroup};

/// A single income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: Uuid,
    pub description: String,
    /// Magnitude in minor currency units; direction comes from `kind`.
    pub amount: i64,
    pub kind: EntryKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<BudgetGroup>,
    pub date: NaiveDate,
}

impl Entry {
    pub fn new(
        description: impl Into<String>,
        amount: i64,
        kind: EntryKind,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let category = category.into();
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            kind,
            group: derive_group(kind, &category),
            category,
            date,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Amount with the direction applied: positive for income, negative for expense.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => self.amount.saturating_neg(),
        }
    }

    /// Budget group for expense entries, falling back to the category table
    /// when the stored group is missing.
    pub fn budget_group(&self) -> Option<BudgetGroup> {
        match self.kind {
            EntryKind::Income => None,
            EntryKind::Expense => {
                Some(self.group.unwrap_or_else(|| group_for_category(&self.category)))
            }
        }
    }

    /// Applies a validated patch, re-deriving the group when category or kind changed.
    pub(crate) fn apply(&mut self, patch: EntryPatch) {
        let regroup = patch.category.is_some() || patch.kind.is_some();
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if regroup {
            self.group = derive_group(self.kind, &self.category);
        }
    }
}

fn derive_group(kind: EntryKind, category: &str) -> Option<BudgetGroup> {
    match kind {
        EntryKind::Income => None,
        EntryKind::Expense => Some(group_for_category(category)),
    }
}

/// Direction of an entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(format!("unknown entry kind `{other}`")),
        }
    }
}

/// Input for creating an entry; id and default date are assigned on add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub description: String,
    pub amount: i64,
    pub kind: EntryKind,
    pub category: String,
    pub date: Option<NaiveDate>,
}

impl NewEntry {
    pub fn income(description: impl Into<String>, amount: i64, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            kind: EntryKind::Income,
            category: category.into(),
            date: None,
        }
    }

    pub fn expense(
        description: impl Into<String>,
        amount: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind: EntryKind::Expense,
            category: category.into(),
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Partial update merged into an existing entry by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub kind: Option<EntryKind>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
