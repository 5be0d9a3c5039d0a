//! Schema migrations embedded at compile time.
//!
//! Migrations run over a synchronous Diesel connection; async callers go
//! through [`run_migrations_async`], which moves the work onto the blocking
//! pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },

    /// The blocking migration task did not complete.
    #[error("migration task aborted: {message}")]
    Aborted { message: String },
}

/// Apply every pending migration, returning how many ran.
///
/// # Errors
///
/// Returns [`MigrationError::Connection`] when the database is unreachable
/// and [`MigrationError::Apply`] when a migration fails; a failed migration
/// leaves earlier ones applied.
pub fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(applied.len())
}

/// Async wrapper around [`run_migrations`].
///
/// # Errors
///
/// As [`run_migrations`], plus [`MigrationError::Aborted`] when the blocking
/// task panics or is cancelled.
pub async fn run_migrations_async(database_url: String) -> Result<usize, MigrationError> {
    tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .map_err(|err| MigrationError::Aborted {
            message: err.to_string(),
        })?
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;
    use rstest::rstest;

    #[rstest]
    fn both_schema_migrations_are_embedded() {
        let migrations =
            MigrationSource::<Pg>::migrations(&MIGRATIONS).expect("embedded migrations load");

        assert_eq!(migrations.len(), 2);
    }

    #[rstest]
    fn unreachable_database_is_a_connection_error() {
        let error = run_migrations("postgres://nobody@127.0.0.1:1/none").expect_err("no server");

        assert!(matches!(error, MigrationError::Connection { .. }));
    }
}
