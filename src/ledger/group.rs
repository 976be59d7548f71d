use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Buckets of the 50/30/20 budgeting rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetGroup {
    Needs,
    Wants,
    Savings,
}

impl BudgetGroup {
    pub const ALL: [BudgetGroup; 3] = [BudgetGroup::Needs, BudgetGroup::Wants, BudgetGroup::Savings];

    /// Share of the total budget this group targets, in percent.
    pub fn target_percent(self) -> i64 {
        match self {
            BudgetGroup::Needs => 50,
            BudgetGroup::Wants => 30,
            BudgetGroup::Savings => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetGroup::Needs => "Needs",
            BudgetGroup::Wants => "Wants",
            BudgetGroup::Savings => "Savings",
        }
    }
}

impl fmt::Display for BudgetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BudgetGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "needs" => Ok(BudgetGroup::Needs),
            "wants" => Ok(BudgetGroup::Wants),
            "savings" => Ok(BudgetGroup::Savings),
            other => Err(format!("unknown budget group `{other}`")),
        }
    }
}

static CATEGORY_GROUPS: Lazy<HashMap<&'static str, BudgetGroup>> = Lazy::new(|| {
    HashMap::from([
        ("groceries", BudgetGroup::Needs),
        ("transportation", BudgetGroup::Needs),
        ("utilities", BudgetGroup::Needs),
        ("housing", BudgetGroup::Needs),
        ("food & dining", BudgetGroup::Wants),
        ("dining out", BudgetGroup::Wants),
        ("entertainment", BudgetGroup::Wants),
        ("shopping", BudgetGroup::Wants),
        ("investments", BudgetGroup::Savings),
        ("emergency fund", BudgetGroup::Savings),
        ("retirement", BudgetGroup::Savings),
    ])
});

/// Maps an expense category to its budget group.
///
/// Lookup is case-insensitive on the trimmed name. Categories outside the
/// table are treated as `Needs`.
pub fn group_for_category(category: &str) -> BudgetGroup {
    let key = category.trim().to_lowercase();
    CATEGORY_GROUPS
        .get(key.as_str())
        .copied()
        .unwrap_or(BudgetGroup::Needs)
}

/// Category names with a known group, in display order.
pub fn known_expense_categories() -> [&'static str; 11] {
    [
        "Groceries",
        "Transportation",
        "Utilities",
        "Housing",
        "Food & Dining",
        "Dining Out",
        "Entertainment",
        "Shopping",
        "Investments",
        "Emergency Fund",
        "Retirement",
    ]
}
