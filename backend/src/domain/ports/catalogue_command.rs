//! Driving port for catalogue writes.

use async_trait::async_trait;

use crate::domain::{Error, Exercise, NewExerciseRequest, NewWorkoutRequest, WorkoutDetail};

/// Domain use-case port for creating exercises and workouts.
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Create an exercise owned by `request.owner`.
    async fn create_exercise(&self, request: &NewExerciseRequest) -> Result<Exercise, Error>;

    /// Create a workout with its ordered exercise links.
    async fn create_workout(&self, request: &NewWorkoutRequest) -> Result<WorkoutDetail, Error>;
}
