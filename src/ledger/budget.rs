use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::{group_for_category, BudgetGroup};

/// A user-defined spending ceiling for a named category.
///
/// Spending is never stored here; it is summed from expense entries whose
/// category matches `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub name: String,
    pub group: BudgetGroup,
    pub allocated_amount: i64,
}

impl BudgetCategory {
    pub fn new(name: impl Into<String>, group: BudgetGroup, allocated_amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            group,
            allocated_amount,
        }
    }

    /// Whether an expense category label belongs to this budget category.
    pub fn matches(&self, category: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(category.trim())
    }
}

/// Input for creating a budget category. A missing group is looked up from
/// the category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudgetCategory {
    pub name: String,
    pub group: Option<BudgetGroup>,
    pub allocated_amount: i64,
}

impl NewBudgetCategory {
    pub fn new(name: impl Into<String>, allocated_amount: i64) -> Self {
        Self {
            name: name.into(),
            group: None,
            allocated_amount,
        }
    }

    pub fn in_group(mut self, group: BudgetGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub(crate) fn into_category(self) -> BudgetCategory {
        let name = self.name.trim().to_string();
        let group = self.group.unwrap_or_else(|| group_for_category(&name));
        BudgetCategory::new(name, group, self.allocated_amount)
    }
}

/// Partial update for a budget category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetCategoryPatch {
    pub name: Option<String>,
    pub group: Option<BudgetGroup>,
    pub allocated_amount: Option<i64>,
}

impl BudgetCategoryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
