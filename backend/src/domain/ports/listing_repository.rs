//! Driven port for the aggregated listing engine.
//!
//! Each call is one store round-trip: the page of rows, their social
//! aggregates and the filtered total are read together so the total can
//! never disagree with the window under concurrent writes.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{ExerciseSummary, ListingQuery, ReviewWithAuthor, WorkoutId, WorkoutSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing adapters.
    pub enum ListingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "listing query failed: {message}",
    }
}

/// Port for filtered, ranked, paginated reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Exercises matching `query`, ranked by like count.
    async fn list_exercises(
        &self,
        query: &ListingQuery,
    ) -> Result<Page<ExerciseSummary>, ListingRepositoryError>;

    /// Workouts matching `query`, ranked by like count.
    ///
    /// Search and tag filters also match through linked exercises.
    async fn list_workouts(
        &self,
        query: &ListingQuery,
    ) -> Result<Page<WorkoutSummary>, ListingRepositoryError>;

    /// Reviews of one workout, newest first, with author usernames.
    async fn reviews_for_workout(
        &self,
        workout_id: &WorkoutId,
        page: &PageRequest,
    ) -> Result<Page<ReviewWithAuthor>, ListingRepositoryError>;
}
