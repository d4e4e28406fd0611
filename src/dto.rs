use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories;
use crate::error::ValidationError;

/// Largest amount a single transaction may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
/// Amounts are currency values, so cents is the finest unit accepted.
pub const MAX_AMOUNT_DECIMAL_PLACES: u32 = 2;
pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Capitalized name for display, e.g. `Income`.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ValidationError::InvalidKind(s.to_string())),
        }
    }
}

/// A stored transaction, as persisted in the storage blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

impl Transaction {
    pub(crate) fn from_request(id: u64, request: TransactionRequest) -> Self {
        Self {
            id,
            kind: request.kind,
            category: request.category,
            amount: request.amount,
            date: request.date,
            description: request.description,
        }
    }

    /// Amount with a leading `+` for income and `-` for expense, e.g. `-$12.50`.
    pub fn signed_amount(&self) -> String {
        let sign = match self.kind {
            TransactionKind::Income => '+',
            TransactionKind::Expense => '-',
        };
        format!("{sign}${:.2}", self.amount)
    }
}

/// Formats a money value with two decimal places, e.g. `$1000.00` or `-$200.00`.
pub fn format_money(value: Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value.abs())
    }
}

/// Typed request to create or replace a transaction.
///
/// Construction does not validate; [`TransactionRequest::validated`] checks the
/// domain invariants and is run by the store on every add and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

impl TransactionRequest {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            date,
            description: description.into(),
        }
    }

    /// Normalizes surrounding whitespace and checks every invariant a stored
    /// transaction must hold.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let category = self.category.trim().to_string();
        let description = self.description.trim().to_string();

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::AmountMustBePositive);
        }
        if self.amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(self.amount));
        }
        if self.amount.normalize().scale() > MAX_AMOUNT_DECIMAL_PLACES {
            return Err(ValidationError::TooManyDecimalPlaces(self.amount));
        }
        if !categories::is_valid(self.kind, &category) {
            return Err(ValidationError::CategoryMismatch {
                kind: self.kind,
                category,
            });
        }
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong);
        }

        Ok(Self {
            category,
            description,
            ..self
        })
    }
}

/// Raw field values as a form (or a CSV row) submits them.
///
/// Any field may be absent or blank; [`TransactionForm::parse`] turns the
/// strings into a typed [`TransactionRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionForm {
    pub fn parse(&self) -> Result<TransactionRequest, ValidationError> {
        let kind = required(&self.kind, "type")?.parse::<TransactionKind>()?;
        let category = required(&self.category, "category")?;
        let amount = required(&self.amount, "amount")?;
        let amount = Decimal::from_str(amount)
            .map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;
        let date = required(&self.date, "date")?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        let description = required(&self.description, "description")?;

        Ok(TransactionRequest::new(
            kind,
            category,
            amount,
            date,
            description,
        ))
    }

    /// Overlays the fields set in `other` onto `self`.
    pub fn merged_with(self, other: TransactionForm) -> Self {
        Self {
            kind: other.kind.or(self.kind),
            category: other.category.or(self.category),
            amount: other.amount.or(self.amount),
            date: other.date.or(self.date),
            description: other.description.or(self.description),
        }
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            kind: Some(transaction.kind.to_string()),
            category: Some(transaction.category.clone()),
            amount: Some(transaction.amount.to_string()),
            date: Some(transaction.date.format(DATE_FORMAT).to_string()),
            description: Some(transaction.description.clone()),
        }
    }
}

fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ValidationError> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(name)),
    }
}
