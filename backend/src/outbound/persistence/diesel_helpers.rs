//! Shared helpers for Diesel repository implementations.
//!
//! Numeric conversions between domain and SQL column types live here so
//! every adapter clamps and logs them the same way.

use tracing::warn;

use super::storage_failure::StorageFailure;

/// Convert a SQL `COUNT(*)` into an unsigned total.
pub(crate) fn count_from_sql(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Convert a domain duration into an `INTEGER` column value.
///
/// Validation bounds durations to the column range, so a failure here means
/// a value bypassed it; the write is refused rather than clamped.
pub(crate) fn u32_to_sql(value: u32, column: &str) -> Result<i32, StorageFailure> {
    i32::try_from(value).map_err(|_| StorageFailure::Other {
        message: format!("{column} value {value} does not fit an INTEGER column"),
    })
}

/// Convert a non-negative `INTEGER` column value into its domain form.
pub(crate) fn u32_from_sql(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Build a failure for a stored row that no longer satisfies domain rules.
pub(crate) fn corrupt_row(table: &str, detail: impl std::fmt::Display) -> StorageFailure {
    warn!(table, %detail, "stored row failed domain validation");
    StorageFailure::Other {
        message: format!("invalid {table} row: {detail}"),
    }
}

/// Log a foreign key violation the adapter has no specific mapping for.
pub(crate) fn warn_unmapped_foreign_key(failure: &StorageFailure) {
    if let StorageFailure::ForeignKeyViolation { constraint } = failure {
        warn!(
            constraint = ?constraint,
            "unrecognised foreign key violation - may need specific error mapping"
        );
    }
}
