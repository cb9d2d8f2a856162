//! Classification of SQLx errors raised by the `urls` and `visits` tables.

/// Name of the unique constraint on `urls.short_id`.
pub const SHORT_ID_UNIQUE_CONSTRAINT: &str = "urls_short_id_key";

/// Returns true if `e` is a unique violation on the short ID column.
pub fn is_short_id_collision(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(SHORT_ID_UNIQUE_CONSTRAINT)
}

/// Returns true if `e` is a foreign key violation (visit for a missing record).
pub fn is_missing_parent(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
