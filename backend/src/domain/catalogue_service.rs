//! Catalogue service: exercise and workout writes, point reads and the
//! aggregated listings.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::info;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, CatalogueRepository, CatalogueRepositoryError,
    ListingRepository, ListingRepositoryError,
};
use crate::domain::{
    Error, Exercise, ExerciseId, ExerciseSummary, ListingRequest, NewExerciseRequest,
    NewWorkoutRequest, RequestValidator, ReviewWithAuthor, WorkoutDetail, WorkoutId,
    WorkoutSummary,
};

/// Catalogue service implementing [`CatalogueCommand`] and [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C, L> {
    catalogue: Arc<C>,
    listings: Arc<L>,
    validator: Arc<RequestValidator>,
    clock: Arc<dyn Clock>,
}

impl<C, L> CatalogueService<C, L> {
    /// Create a service over the catalogue and listing repositories.
    pub fn new(
        catalogue: Arc<C>,
        listings: Arc<L>,
        validator: Arc<RequestValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalogue,
            listings,
            validator,
            clock,
        }
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::storage_unavailable(format!("catalogue store unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue store error: {message}"))
        }
        CatalogueRepositoryError::OwnerNotFound => Error::not_found("owner not found"),
        CatalogueRepositoryError::ExerciseNotFound => {
            Error::not_found("a referenced exercise does not exist")
        }
        CatalogueRepositoryError::DuplicateWorkoutExercise => Error::invalid_field(
            "exercises",
            "an exercise may appear in a workout only once",
        ),
    }
}

fn map_listing_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::storage_unavailable(format!("listing store unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing query failed: {message}"))
        }
    }
}

#[async_trait]
impl<C, L> CatalogueCommand for CatalogueService<C, L>
where
    C: CatalogueRepository,
    L: ListingRepository,
{
    async fn create_exercise(&self, request: &NewExerciseRequest) -> Result<Exercise, Error> {
        let exercise = self.validator.new_exercise(request, self.clock.utc())?;
        let created = self
            .catalogue
            .create_exercise(&exercise)
            .await
            .map_err(map_catalogue_error)?;
        info!(exercise_id = %created.id, owner = %created.owner, "created exercise");
        Ok(created)
    }

    async fn create_workout(&self, request: &NewWorkoutRequest) -> Result<WorkoutDetail, Error> {
        let workout = self.validator.new_workout(request, self.clock.utc())?;
        let created = self
            .catalogue
            .create_workout(&workout)
            .await
            .map_err(map_catalogue_error)?;
        info!(
            workout_id = %created.workout.id,
            exercises = created.exercises.len(),
            "created workout"
        );
        Ok(created)
    }
}

#[async_trait]
impl<C, L> CatalogueQuery for CatalogueService<C, L>
where
    C: CatalogueRepository,
    L: ListingRepository,
{
    async fn exercise(&self, id: &ExerciseId) -> Result<Exercise, Error> {
        self.catalogue
            .find_exercise(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("exercise {id} not found")))
    }

    async fn workout(&self, id: &WorkoutId) -> Result<WorkoutDetail, Error> {
        self.catalogue
            .find_workout(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("workout {id} not found")))
    }

    async fn list_exercises(
        &self,
        request: &ListingRequest,
    ) -> Result<Page<ExerciseSummary>, Error> {
        let query = self.validator.listing(request)?;
        self.listings
            .list_exercises(&query)
            .await
            .map_err(map_listing_error)
    }

    async fn list_workouts(&self, request: &ListingRequest) -> Result<Page<WorkoutSummary>, Error> {
        let query = self.validator.listing(request)?;
        self.listings
            .list_workouts(&query)
            .await
            .map_err(map_listing_error)
    }

    async fn reviews_for_workout(
        &self,
        workout_id: &WorkoutId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<ReviewWithAuthor>, Error> {
        let page = self.validator.page(limit, offset)?;
        self.workout(workout_id).await?;
        self.listings
            .reviews_for_workout(workout_id, &page)
            .await
            .map_err(map_listing_error)
    }
}
