//! Driven port for the per-day weight ledger.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CurrentAttributes, UserId, WeightLogOutcome, WeightSample};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by weight ledger adapters.
    pub enum WeightRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "weight repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "weight repository query failed: {message}",
        /// The sample referenced a user that does not exist.
        UserNotFound => "user not found",
    }
}

/// Port for reading and writing weight samples.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeightRepository: Send + Sync {
    /// Create the sample for its day, or overwrite that day's value.
    ///
    /// Must be a single atomic statement or transaction so concurrent logs
    /// for the same day never produce two rows.
    async fn record(
        &self,
        user_id: &UserId,
        sample: &WeightSample,
    ) -> Result<WeightLogOutcome, WeightRepositoryError>;

    /// Profile attributes joined with the most recent sample.
    async fn current_attributes(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CurrentAttributes>, WeightRepositoryError>;

    /// Samples newest first.
    async fn history(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<Page<WeightSample>, WeightRepositoryError>;
}
