use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::models::Table;

/// Failure of a single store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Unique constraint violated on {table}: {value}")]
    UniqueViolation { table: Table, value: String },

    #[error("Foreign key constraint violated on {table}: {detail}")]
    ForeignKeyViolation { table: Table, detail: String },

    #[error("Check constraint violated on {table}: {detail}")]
    CheckViolation { table: Table, detail: String },
}

impl StoreError {
    /// Maps constraint failures reported by the database onto the typed variants.
    pub fn classify(table: Table, err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return StoreError::Database(err);
        };

        let detail = db_err
            .constraint()
            .map(str::to_string)
            .unwrap_or_else(|| db_err.message().to_string());

        match db_err.kind() {
            ErrorKind::UniqueViolation => StoreError::UniqueViolation {
                table,
                value: detail,
            },
            ErrorKind::ForeignKeyViolation => StoreError::ForeignKeyViolation { table, detail },
            ErrorKind::CheckViolation => StoreError::CheckViolation { table, detail },
            _ => StoreError::Database(err),
        }
    }

    /// True for constraint violations, as opposed to connectivity or query failures.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { .. }
                | StoreError::ForeignKeyViolation { .. }
                | StoreError::CheckViolation { .. }
        )
    }
}
