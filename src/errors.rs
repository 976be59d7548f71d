use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rejections raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    EmptyField(&'static str),
    #[error("Amount must be a positive number.")]
    NonPositiveAmount,
    #[error("Amount must not be negative.")]
    NegativeAmount,
    #[error("Amount exceeds the largest supported value of {max}.")]
    AmountTooLarge { max: String },
    #[error("`{0}` is not a valid amount.")]
    InvalidAmount(String),
    #[error(
        "Allocating {requested} would exceed the total budget of {ceiling} (already allocated: {allocated})."
    )]
    OverAllocation {
        requested: String,
        allocated: String,
        ceiling: String,
    },
    #[error("Total budget {ceiling} is below the {allocated} already allocated to categories.")]
    CeilingBelowAllocations { ceiling: String, allocated: String },
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

impl LedgerError {
    /// Returns the validation failure carried by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
