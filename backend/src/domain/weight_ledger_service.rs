//! Weight ledger service.
//!
//! "Today" is the UTC calendar day of the injected clock, so the first log
//! of a day creates its sample and later logs that day overwrite it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::debug;

use crate::domain::ports::{WeightLedger, WeightRepository, WeightRepositoryError};
use crate::domain::{
    CurrentAttributes, Error, NutritionGoals, RequestValidator, UserId, WeightLogOutcome,
    WeightRequest, WeightSample,
};

/// Weight ledger service implementing [`WeightLedger`].
#[derive(Clone)]
pub struct WeightLedgerService<W> {
    weights: Arc<W>,
    validator: Arc<RequestValidator>,
    clock: Arc<dyn Clock>,
}

impl<W> WeightLedgerService<W> {
    /// Create a service over the given weight repository.
    pub fn new(weights: Arc<W>, validator: Arc<RequestValidator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            weights,
            validator,
            clock,
        }
    }
}

fn map_weight_error(error: WeightRepositoryError) -> Error {
    match error {
        WeightRepositoryError::Connection { message } => {
            Error::storage_unavailable(format!("weight store unavailable: {message}"))
        }
        WeightRepositoryError::Query { message } => {
            Error::internal(format!("weight store error: {message}"))
        }
        WeightRepositoryError::UserNotFound => Error::not_found("user not found"),
    }
}

#[async_trait]
impl<W> WeightLedger for WeightLedgerService<W>
where
    W: WeightRepository,
{
    async fn log_weight(&self, request: &WeightRequest) -> Result<WeightLogOutcome, Error> {
        let weight = self.validator.weight(request)?;
        let sample = WeightSample::new(self.clock.utc().date_naive(), weight);
        let outcome = self
            .weights
            .record(&request.user_id, &sample)
            .await
            .map_err(map_weight_error)?;
        debug!(user_id = %request.user_id, date = %sample.date, ?outcome, "logged weight");
        Ok(outcome)
    }

    async fn current_attributes(&self, user_id: &UserId) -> Result<CurrentAttributes, Error> {
        self.weights
            .current_attributes(user_id)
            .await
            .map_err(map_weight_error)?
            .ok_or_else(|| Error::not_found(format!("no attributes recorded for user {user_id}")))
    }

    async fn history(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<WeightSample>, Error> {
        let page = self.validator.page(limit, offset)?;
        self.weights
            .history(user_id, &page)
            .await
            .map_err(map_weight_error)
    }

    async fn nutrition_goals(&self, user_id: &UserId) -> Result<NutritionGoals, Error> {
        let current = self.current_attributes(user_id).await?;
        Ok(NutritionGoals::for_attributes(&current))
    }
}
