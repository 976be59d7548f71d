pub mod budget_service;
pub mod entry_service;
pub mod summary_service;
pub mod tax_service;

pub use budget_service::{BudgetOverview, BudgetService, CategoryStatus, GroupProgress, RuleBreakdown};
pub use entry_service::EntryService;
pub use summary_service::{
    is_taxable_income, DerivedTotals, GroupTotals, IncomeBreakdown, MonthlyTotals, SummaryService,
};
pub use tax_service::{BracketTax, FilingStatus, TaxEstimate, TaxInput, TaxService};

use crate::currency::{format_minor_units, MAX_AMOUNT};
use crate::errors::ValidationError;

pub type ServiceResult<T> = Result<T, ValidationError>;

/// Percentage of `part` in `whole`; zero when `whole` is not positive.
pub fn percent_of(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_positive(amount: i64) -> ServiceResult<()> {
    if amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    require_supported(amount)
}

pub(crate) fn require_supported(amount: i64) -> ServiceResult<()> {
    if amount > MAX_AMOUNT {
        Err(ValidationError::AmountTooLarge {
            max: format_minor_units(MAX_AMOUNT),
        })
    } else {
        Ok(())
    }
}
