//! Error handling utilities for repositories

use relay_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Map an insert failure under a parent row: unique -> duplicate, FK -> missing parent
pub fn map_child_insert_error<U, P>(e: SqlxError, on_unique: U, on_missing_parent: P) -> DomainError
where
    U: FnOnce() -> DomainError,
    P: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
        if db_err.is_foreign_key_violation() {
            return on_missing_parent();
        }
    }
    map_db_error(e)
}

/// Corrupt or unexpected column value
pub fn invalid_column(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("invalid value in column {column}: {value:?}"))
}
