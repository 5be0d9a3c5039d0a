//! Driving port for the weight ledger and derived nutrition goals.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    CurrentAttributes, Error, NutritionGoals, UserId, WeightLogOutcome, WeightRequest,
    WeightSample,
};

/// Domain use-case port for weight tracking.
#[async_trait]
pub trait WeightLedger: Send + Sync {
    /// Log today's weight; repeats on the same day overwrite it.
    async fn log_weight(&self, request: &WeightRequest) -> Result<WeightLogOutcome, Error>;

    /// Profile attributes with the most recent weight.
    async fn current_attributes(&self, user_id: &UserId) -> Result<CurrentAttributes, Error>;

    /// Weight samples newest first.
    async fn history(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<WeightSample>, Error>;

    /// Daily nutrition goals from the current attributes.
    async fn nutrition_goals(&self, user_id: &UserId) -> Result<NutritionGoals, Error>;
}
