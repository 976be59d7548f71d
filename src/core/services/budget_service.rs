use uuid::Uuid;

use crate::core::services::{
    percent_of, require_positive, require_supported, require_text, ServiceResult,
};
use crate::currency::format_minor_units;
use crate::errors::ValidationError;
use crate::ledger::{
    BudgetCategory, BudgetCategoryPatch, BudgetGroup, Ledger, NewBudgetCategory,
};

use super::SummaryService;

/// Allocation rules for budget categories and the total-budget ceiling.
pub struct BudgetService;

impl BudgetService {
    /// Adds a category after checking the allocation sum stays within the ceiling.
    pub fn add_category(ledger: &mut Ledger, category: NewBudgetCategory) -> ServiceResult<Uuid> {
        require_text("Category name", &category.name)?;
        require_positive(category.allocated_amount)?;
        Self::validate_name(ledger, None, &category.name)?;
        Self::ensure_within_ceiling(
            ledger,
            ledger.allocated_total(),
            category.allocated_amount,
        )?;
        Ok(ledger.add_category(category.into_category()))
    }

    /// Applies `patch` to the category identified by `id`.
    ///
    /// Unknown ids and empty patches are no-ops returning `Ok(false)`.
    pub fn edit_category(
        ledger: &mut Ledger,
        id: Uuid,
        patch: BudgetCategoryPatch,
    ) -> ServiceResult<bool> {
        if let Some(name) = patch.name.as_deref() {
            require_text("Category name", name)?;
            Self::validate_name(ledger, Some(id), name)?;
        }
        if let Some(amount) = patch.allocated_amount {
            require_positive(amount)?;
        }
        if patch.is_empty() {
            return Ok(false);
        }
        let current = match ledger.category(id) {
            Some(category) => category.allocated_amount,
            None => return Ok(false),
        };
        if let Some(amount) = patch.allocated_amount {
            let others = ledger.allocated_total().saturating_sub(current);
            Self::ensure_within_ceiling(ledger, others, amount)?;
        }

        let Some(category) = ledger.category_mut(id) else {
            return Ok(false);
        };
        if let Some(name) = patch.name {
            category.name = name.trim().to_string();
        }
        if let Some(group) = patch.group {
            category.group = group;
        }
        if let Some(amount) = patch.allocated_amount {
            category.allocated_amount = amount;
        }
        Ok(true)
    }

    pub fn remove_category(ledger: &mut Ledger, id: Uuid) -> Option<BudgetCategory> {
        ledger.remove_category(id)
    }

    /// Changes the ceiling; rejected when it would fall below current allocations.
    pub fn set_total_budget(ledger: &mut Ledger, amount: i64) -> ServiceResult<()> {
        if amount < 0 {
            return Err(ValidationError::NegativeAmount);
        }
        require_supported(amount)?;
        let allocated = ledger.allocated_total();
        if amount < allocated {
            return Err(ValidationError::CeilingBelowAllocations {
                ceiling: format_minor_units(amount),
                allocated: format_minor_units(allocated),
            });
        }
        ledger.total_budget = amount;
        Ok(())
    }

    /// Allocated versus spent for every category, in insertion order.
    pub fn category_statuses(ledger: &Ledger) -> Vec<CategoryStatus> {
        ledger
            .categories
            .iter()
            .map(|category| CategoryStatus::new(category.clone(), ledger.spent_for(category)))
            .collect()
    }

    pub fn overview(ledger: &Ledger) -> BudgetOverview {
        let total_allocated = ledger.allocated_total();
        let total_spent: i64 = ledger
            .categories
            .iter()
            .map(|category| ledger.spent_for(category))
            .fold(0, i64::saturating_add);
        BudgetOverview {
            total_budget: ledger.total_budget,
            total_allocated,
            total_spent,
            remaining: total_allocated.saturating_sub(total_spent),
            progress_percent: percent_of(total_spent, total_allocated),
        }
    }

    /// Spending per group against the 50/30/20 split of the total budget.
    pub fn rule_breakdown(ledger: &Ledger) -> RuleBreakdown {
        let spent = SummaryService::group_totals(ledger);
        let groups = BudgetGroup::ALL
            .iter()
            .map(|&group| {
                let target = share_of(ledger.total_budget, group.target_percent());
                let ratio_percent = percent_of(spent.get(group), target);
                GroupProgress {
                    group,
                    spent: spent.get(group),
                    target,
                    ratio_percent,
                    display_percent: ratio_percent.min(100.0),
                }
            })
            .collect();
        RuleBreakdown {
            total_budget: ledger.total_budget,
            groups,
        }
    }

    fn ensure_within_ceiling(ledger: &Ledger, others: i64, requested: i64) -> ServiceResult<()> {
        let exceeds = others
            .checked_add(requested)
            .map_or(true, |total| total > ledger.total_budget);
        if exceeds {
            return Err(ValidationError::OverAllocation {
                requested: format_minor_units(requested),
                allocated: format_minor_units(others),
                ceiling: format_minor_units(ledger.total_budget),
            });
        }
        Ok(())
    }

    fn validate_name(ledger: &Ledger, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        let duplicate = ledger.categories.iter().any(|category| {
            category.matches(candidate) && exclude.map_or(true, |id| category.id != id)
        });
        if duplicate {
            Err(ValidationError::DuplicateCategory(candidate.trim().to_string()))
        } else {
            Ok(())
        }
    }
}

/// `percent`% of `amount`, truncated toward zero.
fn share_of(amount: i64, percent: i64) -> i64 {
    let share = i128::from(amount) * i128::from(percent) / 100;
    i64::try_from(share).unwrap_or(if share < 0 { i64::MIN } else { i64::MAX })
}

/// Allocation and derived spending for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStatus {
    pub category: BudgetCategory,
    pub spent: i64,
    /// Negative when overspent.
    pub remaining: i64,
    /// Unclamped; above 100 when overspent.
    pub percent: f64,
    pub over_budget: bool,
    pub overage: i64,
}

impl CategoryStatus {
    fn new(category: BudgetCategory, spent: i64) -> Self {
        let allocated = category.allocated_amount;
        Self {
            remaining: allocated.saturating_sub(spent),
            percent: percent_of(spent, allocated),
            over_budget: spent > allocated,
            overage: spent.saturating_sub(allocated).max(0),
            spent,
            category,
        }
    }

    /// Progress bar value, capped at 100.
    pub fn display_percent(&self) -> f64 {
        self.percent.min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub total_budget: i64,
    pub total_allocated: i64,
    pub total_spent: i64,
    pub remaining: i64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupProgress {
    pub group: BudgetGroup,
    pub spent: i64,
    pub target: i64,
    pub ratio_percent: f64,
    pub display_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleBreakdown {
    pub total_budget: i64,
    pub groups: Vec<GroupProgress>,
}

impl RuleBreakdown {
    pub fn group(&self, group: BudgetGroup) -> Option<&GroupProgress> {
        self.groups.iter().find(|progress| progress.group == group)
    }
}
