//! Database setup for the application.

use rusqlite::Connection;

use crate::{Error, expense::create_expense_table};

/// Create the application tables in the database if they do not exist.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is some other
/// SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_expense_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialize should succeed");
        initialize(&conn).expect("second initialize should succeed");
    }
}
