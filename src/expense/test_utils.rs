//! Helpers for constructing expenses in tests.

use time::{Date, OffsetDateTime};

use crate::{
    category::Category,
    expense::{Expense, ExpenseId, ExpenseTitle},
};

/// Create an expense with fixed timestamps for use in derivation tests.
pub(crate) fn create_test_expense(
    id: ExpenseId,
    title: &str,
    amount: f64,
    category: Category,
    date: Date,
) -> Expense {
    Expense {
        id,
        title: ExpenseTitle::new_unchecked(title),
        amount,
        category,
        date,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
        revision: 0,
    }
}
