//! Domain-specific errors for the transaction tracker.
//!
//! Contains error variants for common failure cases like:
//! - Request validation errors (missing field, non-positive amount, category mismatch)
//! - Lookups of unknown transaction ids
//! - Failures of the storage collaborator or of CSV export/import
//!
//! Malformed persisted data is deliberately absent here: loading recovers to
//! an empty store instead of surfacing an error.

use rust_decimal::Decimal;

use crate::dto::TransactionKind;
use crate::stores::StorageError;

/// A violated constraint on a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("\"{0}\" is not a transaction type, expected income or expense")]
    InvalidKind(String),

    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("amount must be greater than 0")]
    AmountMustBePositive,

    #[error("amount {0} exceeds the maximum of {max}", max = crate::dto::MAX_AMOUNT)]
    AmountTooLarge(Decimal),

    #[error("amount {0} has more than 2 decimal places")]
    TooManyDecimalPlaces(Decimal),

    #[error("category \"{category}\" is not a valid {kind} category")]
    CategoryMismatch {
        kind: TransactionKind,
        category: String,
    },

    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("description is longer than {max} characters", max = crate::dto::MAX_DESCRIPTION_LEN)]
    DescriptionTooLong,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no transaction with id {0}")]
    NotFound(u64),

    /// The largest stored id is `u64::MAX`, so no fresh id can be assigned.
    #[error("no transaction ids left to assign")]
    IdsExhausted,

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV import row that could not be added; rows before it were kept.
    #[error("row {row}: {source}")]
    ImportRow {
        row: usize,
        #[source]
        source: Box<Error>,
    },
}
