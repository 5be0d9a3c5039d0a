//! Driving port for catalogue reads and listings.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    Error, Exercise, ExerciseId, ExerciseSummary, ListingRequest, ReviewWithAuthor,
    WorkoutDetail, WorkoutId, WorkoutSummary,
};

/// Domain use-case port for browsing the catalogue.
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Fetch one exercise.
    async fn exercise(&self, id: &ExerciseId) -> Result<Exercise, Error>;

    /// Fetch one workout with its exercise links.
    async fn workout(&self, id: &WorkoutId) -> Result<WorkoutDetail, Error>;

    /// List exercises with like aggregates and a filtered total.
    async fn list_exercises(
        &self,
        request: &ListingRequest,
    ) -> Result<Page<ExerciseSummary>, Error>;

    /// List workouts with like and review aggregates and a filtered total.
    async fn list_workouts(&self, request: &ListingRequest) -> Result<Page<WorkoutSummary>, Error>;

    /// Reviews for a workout, newest first.
    async fn reviews_for_workout(
        &self,
        workout_id: &WorkoutId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<ReviewWithAuthor>, Error>;
}
