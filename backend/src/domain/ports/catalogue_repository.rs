//! Driven port for exercise and workout storage.

use async_trait::async_trait;

use crate::domain::{Exercise, ExerciseId, NewExercise, NewWorkout, WorkoutDetail, WorkoutId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue repository query failed: {message}",
        /// The owning user does not exist.
        OwnerNotFound => "owner not found",
        /// A workout referenced an exercise that does not exist.
        ExerciseNotFound => "referenced exercise not found",
        /// A workout linked the same exercise twice.
        DuplicateWorkoutExercise => "exercise linked to the workout more than once",
    }
}

/// Port for catalogue writes and point reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Insert an exercise.
    async fn create_exercise(
        &self,
        exercise: &NewExercise,
    ) -> Result<Exercise, CatalogueRepositoryError>;

    /// Insert a workout and all of its exercise links in one transaction.
    async fn create_workout(
        &self,
        workout: &NewWorkout,
    ) -> Result<WorkoutDetail, CatalogueRepositoryError>;

    /// Fetch an exercise by id.
    async fn find_exercise(
        &self,
        id: &ExerciseId,
    ) -> Result<Option<Exercise>, CatalogueRepositoryError>;

    /// Fetch a workout with its ordered exercise links.
    async fn find_workout(
        &self,
        id: &WorkoutId,
    ) -> Result<Option<WorkoutDetail>, CatalogueRepositoryError>;
}
