//! Validated `limit`/`offset` windows.

use serde::Serialize;

use crate::PaginationError;

/// Page size applied when a caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size accepted unless a policy overrides it.
pub const MAX_LIMIT: u32 = 100;

/// Default and ceiling page sizes for a listing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_limit: u32,
    max_limit: u32,
}

impl PageLimits {
    /// Build a policy, rejecting a default outside `1..=max_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPolicy`] when `default_limit` is zero
    /// or larger than `max_limit`.
    pub const fn new(default_limit: u32, max_limit: u32) -> Result<Self, PaginationError> {
        if default_limit == 0 || default_limit > max_limit {
            return Err(PaginationError::InvalidPolicy {
                default_limit,
                max_limit,
            });
        }
        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Page size used when the caller omits one.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Largest page size accepted.
    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// A validated pagination window.
///
/// ## Invariants
/// - `limit` is at least one and never above the policy ceiling it was
///   validated against.
/// - `offset` fits in a signed 64-bit SQL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Validate raw, possibly missing, caller parameters against `limits`.
    ///
    /// A missing limit falls back to the policy default and a missing offset
    /// falls back to zero.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::LimitOutOfRange`] for a limit outside
    /// `1..=limits.max_limit()` and [`PaginationError::NegativeOffset`] for a
    /// negative offset.
    pub fn from_raw(
        limit: Option<i64>,
        offset: Option<i64>,
        limits: PageLimits,
    ) -> Result<Self, PaginationError> {
        let limit = match limit {
            None => limits.default_limit(),
            Some(raw) => u32::try_from(raw)
                .ok()
                .filter(|value| (1..=limits.max_limit()).contains(value))
                .ok_or(PaginationError::LimitOutOfRange {
                    limit: raw,
                    max: limits.max_limit(),
                })?,
        };
        let offset = match offset {
            None => 0,
            Some(raw) => {
                u64::try_from(raw).map_err(|_| PaginationError::NegativeOffset { offset: raw })?
            }
        };
        Ok(Self { limit, offset })
    }

    /// Window of the first `limit` items.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::LimitOutOfRange`] when `limit` is zero or
    /// above [`MAX_LIMIT`].
    pub fn first(limit: u32) -> Result<Self, PaginationError> {
        Self::from_raw(Some(i64::from(limit)), Some(0), PageLimits::default())
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Limit as a SQL `BIGINT` parameter.
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Offset as a SQL `BIGINT` parameter.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// The window immediately after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit as u64),
        }
    }
}
