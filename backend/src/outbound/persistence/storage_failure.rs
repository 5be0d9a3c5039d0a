//! Driver-neutral classification of storage failures.
//!
//! Diesel reports uniqueness and foreign-key problems as database error
//! kinds carrying the violated constraint name. Adapters classify each
//! failure once, here, and then map the classification onto their own port
//! error by constraint name, so no adapter branches on driver details.

use std::future::Future;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::{DbPool, PoolError};

/// Coarse storage failure shape shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    /// A unique or primary-key constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: Option<String> },
    /// A single-row read matched nothing.
    NotFound,
    /// The store could not be reached, or the operation ran out of time.
    Unavailable { message: String },
    /// Anything else; detail stays in the logs.
    Other { message: String },
}

impl StorageFailure {
    /// Whether this is a unique violation on `constraint`.
    pub(crate) fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(name) } if name == constraint)
    }

    /// Whether this is a foreign key violation on `constraint`.
    pub(crate) fn is_foreign_key_violation_of(&self, constraint: &str) -> bool {
        matches!(self, Self::ForeignKeyViolation { constraint: Some(name) } if name == constraint)
    }

    /// Message suitable for a port error's `message` field.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::UniqueViolation { constraint } => {
                format!("unique constraint violated: {}", display_constraint(constraint))
            }
            Self::ForeignKeyViolation { constraint } => {
                format!("foreign key violated: {}", display_constraint(constraint))
            }
            Self::NotFound => "record not found".to_owned(),
            Self::Unavailable { message } | Self::Other { message } => message.clone(),
        }
    }
}

fn display_constraint(constraint: &Option<String>) -> &str {
    constraint.as_deref().unwrap_or("<unnamed>")
}

impl From<DieselError> for StorageFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(
                    ?kind,
                    message = info.message(),
                    constraint = info.constraint_name(),
                    "diesel operation failed"
                );
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager => Self::Unavailable {
                message: "database connection error".to_owned(),
            },
            DieselError::QueryBuilderError(_) => Self::Other {
                message: "database query error".to_owned(),
            },
            DieselError::DeserializationError(_) => Self::Other {
                message: "row decoding failed".to_owned(),
            },
            _ => Self::Other {
                message: "database error".to_owned(),
            },
        }
    }
}

impl From<PoolError> for StorageFailure {
    fn from(error: PoolError) -> Self {
        Self::Unavailable {
            message: error.to_string(),
        }
    }
}

/// Run one store operation, checkout included, under the pool deadline.
pub(crate) async fn with_deadline<T, F>(pool: &DbPool, operation: F) -> Result<T, StorageFailure>
where
    F: Future<Output = Result<T, StorageFailure>>,
{
    pool.within_deadline(operation).await?
}
