//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.
//!
//! A workout and its exercise links are written in one transaction; links
//! are numbered from one in plan order and read back ordered by position.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    Exercise, ExerciseId, NewExercise, NewWorkout, TagSet, UserId, Workout, WorkoutDetail,
    WorkoutExerciseEntry, WorkoutId,
};

use super::diesel_helpers::{corrupt_row, u32_from_sql, u32_to_sql, warn_unmapped_foreign_key};
use super::models::{ExerciseRow, NewWorkoutExerciseRow, WorkoutExerciseEntryRow, WorkoutRow};
use super::pool::DbPool;
use super::schema::{exercises, workout_exercises, workouts};
use super::storage_failure::{StorageFailure, with_deadline};

const EXERCISE_OWNER_KEY: &str = "exercises_user_id_fkey";
const WORKOUT_OWNER_KEY: &str = "workouts_user_id_fkey";
const LINKED_EXERCISE_KEY: &str = "workout_exercises_exercise_id_fkey";
const WORKOUT_LINK_KEY: &str = "workout_exercises_pkey";

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> CatalogueRepositoryError {
    if failure.is_foreign_key_violation_of(EXERCISE_OWNER_KEY)
        || failure.is_foreign_key_violation_of(WORKOUT_OWNER_KEY)
    {
        return CatalogueRepositoryError::owner_not_found();
    }
    if failure.is_foreign_key_violation_of(LINKED_EXERCISE_KEY) {
        return CatalogueRepositoryError::exercise_not_found();
    }
    if failure.is_unique_violation_of(WORKOUT_LINK_KEY) {
        return CatalogueRepositoryError::duplicate_workout_exercise();
    }
    warn_unmapped_foreign_key(&failure);
    match failure {
        StorageFailure::Unavailable { message } => CatalogueRepositoryError::connection(message),
        other => CatalogueRepositoryError::query(other.message()),
    }
}

/// Convert a stored exercise row into the domain aggregate.
pub(super) fn exercise_from_row(row: ExerciseRow) -> Result<Exercise, StorageFailure> {
    let muscles = TagSet::new(&row.muscles).map_err(|err| corrupt_row("exercises", err))?;
    Ok(Exercise {
        id: ExerciseId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        name: row.name,
        description: row.description,
        is_duration: row.is_duration,
        duration_secs: u32_from_sql(row.duration_secs),
        tutorial_link: row.tutorial_link,
        muscles,
        created_at: row.created_at,
    })
}

/// Convert a stored workout row into the domain header.
pub(super) fn workout_from_row(row: WorkoutRow) -> Workout {
    Workout {
        id: WorkoutId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        name: row.name,
        description: row.description,
        tutorial_link: row.tutorial_link,
        created_at: row.created_at,
    }
}

fn entry_from_row(row: WorkoutExerciseEntryRow) -> WorkoutExerciseEntry {
    WorkoutExerciseEntry {
        exercise_id: ExerciseId::from_uuid(row.exercise_id),
        exercise_name: row.exercise_name,
        position: u32_from_sql(row.position),
        duration_secs: u32_from_sql(row.duration_secs),
    }
}

fn exercise_row(exercise: &NewExercise) -> Result<ExerciseRow, StorageFailure> {
    Ok(ExerciseRow {
        id: *exercise.id.as_uuid(),
        user_id: *exercise.owner.as_uuid(),
        name: exercise.name.as_ref().to_owned(),
        description: exercise.description.as_ref().to_owned(),
        is_duration: exercise.is_duration,
        duration_secs: u32_to_sql(exercise.duration_secs, "duration_secs")?,
        tutorial_link: exercise
            .tutorial_link
            .as_ref()
            .map(|link| link.as_ref().to_owned()),
        muscles: exercise.muscles.to_vec(),
        created_at: exercise.created_at,
    })
}

fn workout_rows(
    workout: &NewWorkout,
) -> Result<(WorkoutRow, Vec<NewWorkoutExerciseRow>), StorageFailure> {
    let id = *workout.id.as_uuid();
    let header = WorkoutRow {
        id,
        user_id: *workout.owner.as_uuid(),
        name: workout.name.as_ref().to_owned(),
        description: workout.description.as_ref().to_owned(),
        tutorial_link: workout
            .tutorial_link
            .as_ref()
            .map(|link| link.as_ref().to_owned()),
        created_at: workout.created_at,
    };
    let links = workout
        .plan
        .slots()
        .iter()
        .zip(1_i32..)
        .map(|(slot, position)| {
            Ok(NewWorkoutExerciseRow {
                workout_id: id,
                exercise_id: *slot.exercise_id.as_uuid(),
                position,
                duration_secs: u32_to_sql(slot.duration_secs, "duration_secs")?,
            })
        })
        .collect::<Result<Vec<_>, StorageFailure>>()?;
    Ok((header, links))
}

async fn load_entries<C>(
    conn: &mut C,
    workout_id: Uuid,
) -> Result<Vec<WorkoutExerciseEntryRow>, diesel::result::Error>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    workout_exercises::table
        .inner_join(exercises::table)
        .filter(workout_exercises::workout_id.eq(workout_id))
        .order(workout_exercises::position.asc())
        .select((
            workout_exercises::exercise_id,
            exercises::name,
            workout_exercises::position,
            workout_exercises::duration_secs,
        ))
        .load(conn)
        .await
}

fn detail_from_rows(
    header: WorkoutRow,
    entries: Vec<WorkoutExerciseEntryRow>,
) -> WorkoutDetail {
    WorkoutDetail {
        workout: workout_from_row(header),
        exercises: entries.into_iter().map(entry_from_row).collect(),
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn create_exercise(
        &self,
        exercise: &NewExercise,
    ) -> Result<Exercise, CatalogueRepositoryError> {
        let row = exercise_row(exercise).map_err(map_failure)?;

        let stored: ExerciseRow = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let stored = diesel::insert_into(exercises::table)
                .values(&row)
                .returning(ExerciseRow::as_returning())
                .get_result(&mut conn)
                .await?;
            Ok(stored)
        })
        .await
        .map_err(map_failure)?;

        exercise_from_row(stored).map_err(map_failure)
    }

    async fn create_workout(
        &self,
        workout: &NewWorkout,
    ) -> Result<WorkoutDetail, CatalogueRepositoryError> {
        let (header, links) = workout_rows(workout).map_err(map_failure)?;
        let workout_id = header.id;

        let (stored, entries) = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    let stored: WorkoutRow = diesel::insert_into(workouts::table)
                        .values(&header)
                        .returning(WorkoutRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(workout_exercises::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                    let entries = load_entries(conn, workout_id).await?;
                    Ok((stored, entries))
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        Ok(detail_from_rows(stored, entries))
    }

    async fn find_exercise(
        &self,
        id: &ExerciseId,
    ) -> Result<Option<Exercise>, CatalogueRepositoryError> {
        let row: Option<ExerciseRow> = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let row = exercises::table
                .find(id.as_uuid())
                .select(ExerciseRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_failure)?;

        row.map(exercise_from_row).transpose().map_err(map_failure)
    }

    async fn find_workout(
        &self,
        id: &WorkoutId,
    ) -> Result<Option<WorkoutDetail>, CatalogueRepositoryError> {
        let workout_id = *id.as_uuid();

        let found = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            conn.transaction::<_, StorageFailure, _>(|conn| {
                async move {
                    let header: Option<WorkoutRow> = workouts::table
                        .find(workout_id)
                        .select(WorkoutRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(header) = header else {
                        return Ok(None);
                    };
                    let entries = load_entries(conn, workout_id).await?;
                    Ok(Some((header, entries)))
                }
                .scope_boxed()
            })
            .await
        })
        .await
        .map_err(map_failure)?;

        Ok(found.map(|(header, entries)| detail_from_rows(header, entries)))
    }
}
