//! Data access: one module per table.
//!
//! Every function acquires a single pooled connection, runs one statement on
//! it, and hands the connection back to the pool when the guard drops, on the
//! success and the error path alike. No function holds a connection across
//! statements.

pub mod comments;
pub mod roles;
pub mod setup;
pub mod tickets;
pub mod users;

/// Turn a zero-row update or delete into `RowNotFound`.
fn require_row(result: sqlx::sqlite::SqliteQueryResult) -> Result<(), sqlx::Error> {
    if result.rows_affected() == 0 {
        Err(sqlx::Error::RowNotFound)
    } else {
        Ok(())
    }
}
