//! Running totals derived from a list of transactions.

use rust_decimal::Decimal;

use crate::dto::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_balance: Decimal,
}

/// Whether income covers expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Surplus,
    Deficit,
}

impl Summary {
    /// A zero net balance counts as a surplus.
    pub fn standing(&self) -> Standing {
        if self.net_balance < Decimal::ZERO {
            Standing::Deficit
        } else {
            Standing::Surplus
        }
    }
}

/// Sums income and expense amounts. Order of `transactions` does not matter.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (total_income, total_expense) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), transaction| match transaction.kind {
            TransactionKind::Income => (income + transaction.amount, expense),
            TransactionKind::Expense => (income, expense + transaction.amount),
        },
    );

    Summary {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
    }
}
