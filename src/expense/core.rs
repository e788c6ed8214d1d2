//! Defines the core expense model and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, category::Category};

/// The format of dates in query strings and form submissions, matching the
/// value format of HTML date inputs.
pub(crate) const DATE_INPUT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A validated expense title.
///
/// Titles are non-empty after trimming and at most
/// [ExpenseTitle::MAX_LENGTH] characters long, where a character is a
/// user-perceived character (grapheme cluster) rather than a byte or code
/// point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseTitle(String);

impl ExpenseTitle {
    /// The maximum number of characters in a title.
    pub const MAX_LENGTH: usize = 60;

    /// Create an expense title.
    ///
    /// # Errors
    /// Returns [Error::EmptyTitle] if `title` is empty after trimming
    /// whitespace, or [Error::TitleTooLong] if it is longer than
    /// [ExpenseTitle::MAX_LENGTH] characters.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        let length = title.graphemes(true).count();

        if length > Self::MAX_LENGTH {
            return Err(Error::TitleTooLong(length));
        }

        Ok(Self(title.to_owned()))
    }

    /// Create an expense title without validation.
    ///
    /// The caller should ensure the string is non-empty and within the
    /// length limit. Violating the invariant causes incorrect behaviour but
    /// is not unsafe.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }

    /// The title text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExpenseTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExpenseTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseTitle::new(s)
    }
}

impl Display for ExpenseTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the expense was for.
    pub title: ExpenseTitle,
    /// How much money was spent.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category: Category,
    /// The calendar date the expense happened on.
    pub date: Date,
    /// When the expense was first recorded. Set once.
    pub created_at: OffsetDateTime,
    /// When the expense was last modified. Refreshed on every update.
    pub updated_at: OffsetDateTime,
    /// Monotonic sequence number, incremented on every update.
    ///
    /// Edit forms carry the revision they were rendered from so that a
    /// stale submission is rejected instead of silently overwriting a
    /// newer one.
    pub revision: i64,
}

/// The validated input for creating an expense or replacing its fields.
///
/// Handlers validate raw form input into a `NewExpense` once, at the
/// boundary. The database functions below only accept already-validated
/// input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the expense was for.
    pub title: ExpenseTitle,
    /// How much money was spent.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category: Category,
    /// The calendar date the expense happened on.
    pub date: Date,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// # Errors
    /// Returns [Error::EmptyTitle] or [Error::TitleTooLong] for an invalid
    /// title, or [Error::NegativeAmount] if `amount` is negative or not a
    /// finite number.
    pub fn new(title: &str, amount: f64, category: Category, date: Date) -> Result<Self, Error> {
        let title = ExpenseTitle::new(title)?;

        // `!(amount >= 0.0)` also catches NaN.
        if !(amount >= 0.0 && amount.is_finite()) {
            return Err(Error::NegativeAmount(amount));
        }

        Ok(Self {
            title,
            amount,
            category,
            date,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense in the database.
///
/// Sets `created_at` and `updated_at` to the current instant and the
/// revision to zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    let expense = connection
        .prepare(
            "INSERT INTO expense (title, amount, category, date, created_at, updated_at, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, 0)
             RETURNING id, title, amount, category, date, created_at, updated_at, revision",
        )?
        .query_row(
            params![
                new_expense.title.as_str(),
                new_expense.amount,
                new_expense.category,
                new_expense.date,
                now,
            ],
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, title, amount, category, date, created_at, updated_at, revision
             FROM expense WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve all expenses, most recent date first.
///
/// Ties on date are broken by ID so that the order is stable across
/// updates.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, category, date, created_at, updated_at, revision
             FROM expense ORDER BY date DESC, id ASC",
        )?
        .query_map([], map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

/// Replace the fields of the expense `id` at `revision`.
///
/// Refreshes `updated_at` and increments the revision. The update only
/// applies if the stored revision still matches `revision`, so a form
/// submitted from an outdated page cannot silently overwrite a newer
/// change.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::EditConflict] if the expense was modified since `revision`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    revision: i64,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    let result = connection
        .prepare(
            "UPDATE expense
             SET title = ?1, amount = ?2, category = ?3, date = ?4,
                 updated_at = ?5, revision = revision + 1
             WHERE id = ?6 AND revision = ?7
             RETURNING id, title, amount, category, date, created_at, updated_at, revision",
        )?
        .query_row(
            params![
                new_expense.title.as_str(),
                new_expense.amount,
                new_expense.category,
                new_expense.date,
                now,
                id,
                revision,
            ],
            map_expense_row,
        );

    match result {
        Ok(expense) => Ok(expense),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            // Zero rows means either the expense is gone or the revision is
            // stale. Tell the caller which.
            if expense_exists(id, connection)? {
                Err(Error::EditConflict)
            } else {
                Err(Error::UpdateMissingExpense)
            }
        }
        Err(error) => Err(error.into()),
    }
}

/// Delete the expense `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingExpense)
    } else {
        Ok(())
    }
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
        (),
    )?;

    // Index used by the default date ordering of the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

fn expense_exists(id: ExpenseId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM expense WHERE id = :id)",
            &[(":id", &id)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let title: String = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;
    let created_at = row.get(5)?;
    let updated_at = row.get(6)?;
    let revision = row.get(7)?;

    Ok(Expense {
        id,
        title: ExpenseTitle::new_unchecked(&title),
        amount,
        category,
        date,
        created_at,
        updated_at,
        revision,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod new_expense_tests {
    use time::macros::date;

    use super::NewExpense;
    use crate::{Error, category::Category};

    #[test]
    fn accepts_valid_input() {
        let result = NewExpense::new("Groceries", 52.40, Category::Food, date!(2024 - 01 - 10));

        assert!(result.is_ok(), "unexpected error: {result:?}");
    }

    #[test]
    fn accepts_zero_amount() {
        let result = NewExpense::new("Free sample", 0.0, Category::Other, date!(2024 - 01 - 10));

        assert!(result.is_ok(), "unexpected error: {result:?}");
    }

    #[test]
    fn rejects_negative_amount() {
        let result = NewExpense::new("Refund", -5.0, Category::Other, date!(2024 - 01 - 10));

        assert_eq!(result, Err(Error::NegativeAmount(-5.0)));
    }

    #[test]
    fn rejects_nan_amount() {
        let result = NewExpense::new("Oops", f64::NAN, Category::Other, date!(2024 - 01 - 10));

        assert!(
            matches!(result, Err(Error::NegativeAmount(_))),
            "want NegativeAmount error, got {result:?}"
        );
    }
}
