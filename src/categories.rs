//! The fixed category lists, keyed by transaction kind.

use crate::dto::TransactionKind;

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Investments",
    "Gifts",
    "Other Income",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Rent",
    "Healthcare",
    "Education",
    "Shopping",
    "Other Expenses",
];

/// Categories a transaction of `kind` may use.
pub fn for_kind(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

/// Matching is exact: `"food"` is not the `Food` category.
pub fn is_valid(kind: TransactionKind, category: &str) -> bool {
    for_kind(kind).contains(&category)
}

/// Every category of every kind, income first, for building a list filter.
pub fn filter_options() -> impl Iterator<Item = &'static str> {
    INCOME_CATEGORIES
        .iter()
        .chain(EXPENSE_CATEGORIES.iter())
        .copied()
}

/// Whether `category` belongs to any kind.
pub fn is_known(category: &str) -> bool {
    filter_options().any(|known| known == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_belong_to_their_kind() {
        assert!(is_valid(TransactionKind::Income, "Salary"));
        assert!(is_valid(TransactionKind::Expense, "Rent"));
        assert!(!is_valid(TransactionKind::Income, "Rent"));
        assert!(!is_valid(TransactionKind::Expense, "Salary"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!is_valid(TransactionKind::Expense, "food"));
        assert!(!is_valid(TransactionKind::Expense, ""));
    }

    #[test]
    fn test_filter_options_lists_income_then_expense() {
        let options: Vec<_> = filter_options().collect();
        assert_eq!(
            options.len(),
            INCOME_CATEGORIES.len() + EXPENSE_CATEGORIES.len()
        );
        assert_eq!(options.first(), Some(&"Salary"));
        assert_eq!(options.last(), Some(&"Other Expenses"));
    }

    #[test]
    fn test_is_known_covers_both_kinds() {
        assert!(is_known("Gifts"));
        assert!(is_known("Shopping"));
        assert!(!is_known("Groceries"));
        assert!(!is_known("shopping"));
    }
}
