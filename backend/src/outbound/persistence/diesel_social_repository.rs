//! PostgreSQL-backed `SocialRepository` implementation using Diesel ORM.
//!
//! Like uniqueness is the composite primary key on each likes table; the
//! adapter only translates the violation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SocialRepository, SocialRepositoryError};
use crate::domain::{LikeTarget, NewReview, Rating, Review, ReviewId, UserId, WorkoutId};

use super::diesel_helpers::{corrupt_row, warn_unmapped_foreign_key};
use super::models::ReviewRow;
use super::pool::DbPool;
use super::schema::{exercise_likes, workout_likes, workout_reviews};
use super::storage_failure::{StorageFailure, with_deadline};

const DUPLICATE_LIKE_KEYS: [&str; 2] = ["exercise_likes_pkey", "workout_likes_pkey"];
const TARGET_KEYS: [&str; 3] = [
    "exercise_likes_exercise_id_fkey",
    "workout_likes_workout_id_fkey",
    "workout_reviews_workout_id_fkey",
];
const USER_KEYS: [&str; 3] = [
    "exercise_likes_user_id_fkey",
    "workout_likes_user_id_fkey",
    "workout_reviews_user_id_fkey",
];

/// Diesel-backed implementation of the [`SocialRepository`] port.
#[derive(Clone)]
pub struct DieselSocialRepository {
    pool: DbPool,
}

impl DieselSocialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StorageFailure) -> SocialRepositoryError {
    if DUPLICATE_LIKE_KEYS
        .iter()
        .any(|key| failure.is_unique_violation_of(key))
    {
        return SocialRepositoryError::duplicate_like();
    }
    if TARGET_KEYS
        .iter()
        .any(|key| failure.is_foreign_key_violation_of(key))
    {
        return SocialRepositoryError::target_not_found();
    }
    if USER_KEYS
        .iter()
        .any(|key| failure.is_foreign_key_violation_of(key))
    {
        return SocialRepositoryError::user_not_found();
    }
    warn_unmapped_foreign_key(&failure);
    match failure {
        StorageFailure::Unavailable { message } => SocialRepositoryError::connection(message),
        other => SocialRepositoryError::query(other.message()),
    }
}

fn review_row(review: &NewReview) -> ReviewRow {
    ReviewRow {
        id: *review.id.as_uuid(),
        workout_id: *review.workout_id.as_uuid(),
        user_id: *review.author.as_uuid(),
        rating: i16::from(review.rating.get()),
        title: review.title.clone(),
        content: review.content.clone(),
        created_at: review.created_at,
    }
}

fn review_from_row(row: ReviewRow) -> Result<Review, StorageFailure> {
    let rating =
        Rating::new(i64::from(row.rating)).map_err(|err| corrupt_row("workout_reviews", err))?;
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        workout_id: WorkoutId::from_uuid(row.workout_id),
        author: UserId::from_uuid(row.user_id),
        rating,
        title: row.title,
        content: row.content,
        created_at: row.created_at,
    })
}

#[async_trait]
impl SocialRepository for DieselSocialRepository {
    async fn like(
        &self,
        user_id: &UserId,
        target: LikeTarget,
        liked_at: DateTime<Utc>,
    ) -> Result<(), SocialRepositoryError> {
        let user = *user_id.as_uuid();

        with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            match target {
                LikeTarget::Exercise(exercise_id) => {
                    diesel::insert_into(exercise_likes::table)
                        .values((
                            exercise_likes::user_id.eq(user),
                            exercise_likes::exercise_id.eq(*exercise_id.as_uuid()),
                            exercise_likes::created_at.eq(liked_at),
                        ))
                        .execute(&mut conn)
                        .await?;
                }
                LikeTarget::Workout(workout_id) => {
                    diesel::insert_into(workout_likes::table)
                        .values((
                            workout_likes::user_id.eq(user),
                            workout_likes::workout_id.eq(*workout_id.as_uuid()),
                            workout_likes::created_at.eq(liked_at),
                        ))
                        .execute(&mut conn)
                        .await?;
                }
            }
            Ok(())
        })
        .await
        .map_err(map_failure)
    }

    async fn unlike(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, SocialRepositoryError> {
        let user = *user_id.as_uuid();

        let removed = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let removed = match target {
                LikeTarget::Exercise(exercise_id) => {
                    diesel::delete(
                        exercise_likes::table.filter(
                            exercise_likes::user_id
                                .eq(user)
                                .and(exercise_likes::exercise_id.eq(*exercise_id.as_uuid())),
                        ),
                    )
                    .execute(&mut conn)
                    .await?
                }
                LikeTarget::Workout(workout_id) => {
                    diesel::delete(
                        workout_likes::table.filter(
                            workout_likes::user_id
                                .eq(user)
                                .and(workout_likes::workout_id.eq(*workout_id.as_uuid())),
                        ),
                    )
                    .execute(&mut conn)
                    .await?
                }
            };
            Ok(removed)
        })
        .await
        .map_err(map_failure)?;

        Ok(removed > 0)
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review, SocialRepositoryError> {
        let row = review_row(review);

        let stored: ReviewRow = with_deadline(&self.pool, async {
            let mut conn = self.pool.get().await?;
            let stored = diesel::insert_into(workout_reviews::table)
                .values(&row)
                .returning(ReviewRow::as_returning())
                .get_result(&mut conn)
                .await?;
            Ok(stored)
        })
        .await
        .map_err(map_failure)?;

        review_from_row(stored).map_err(map_failure)
    }
}
