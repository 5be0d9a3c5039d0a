//! Validation errors raised while building pagination parameters.

use thiserror::Error;

/// Errors returned when raw pagination input cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The requested page size is zero, negative or above the ceiling.
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Raw limit supplied by the caller.
        limit: i64,
        /// Largest limit the policy accepts.
        max: u32,
    },
    /// The requested offset is negative.
    #[error("offset must not be negative, got {offset}")]
    NegativeOffset {
        /// Raw offset supplied by the caller.
        offset: i64,
    },
    /// A page-limit policy was built with an unusable default.
    #[error("default limit {default_limit} must be between 1 and {max_limit}")]
    InvalidPolicy {
        /// Proposed default limit.
        default_limit: u32,
        /// Proposed maximum limit.
        max_limit: u32,
    },
    /// A sort direction string was neither `asc` nor `desc`.
    #[error("sort direction must be `asc` or `desc`, got `{value}`")]
    UnknownSortDirection {
        /// Raw value supplied by the caller.
        value: String,
    },
}
