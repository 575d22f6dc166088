// Copyright 2023 Remi Bernotavicius

use diesel::result::DatabaseErrorKind;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure taxonomy for the store. A missing row is not an error; reads
/// return `Ok(None)` and deletes return `Ok(false)` for an unknown id.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bad request payload, rejected before anything is written.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Restrict-delete: the unit is still referenced by recipe ingredient
    /// lines.
    #[error("unit type is still referenced by {count} recipe ingredient line(s)")]
    UnitTypeInUse { count: i64 },

    /// A storage-layer uniqueness, foreign-key, or check constraint fired.
    /// The transaction it happened in has been rolled back.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("failed to run migrations: {0}")]
    Migration(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller, not the store, is at fault. The transport maps
    /// client errors to 4xx-style responses and the rest to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnitTypeInUse { .. } | Self::Constraint(_)
        )
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::Constraint(info.message().into()),
            other => Self::Database(other),
        }
    }
}
