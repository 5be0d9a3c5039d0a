//! Likes and reviews.
//!
//! Uniqueness of likes is enforced by storage alone; a second like from the
//! same user surfaces as a `duplicate_like` conflict rather than a failure.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SocialCommand, SocialRepository, SocialRepositoryError};
use crate::domain::{ConflictKind, Error, LikeTarget, RequestValidator, Review, ReviewRequest, UserId};

/// Social service implementing [`SocialCommand`].
#[derive(Clone)]
pub struct SocialService<S> {
    social: Arc<S>,
    validator: Arc<RequestValidator>,
    clock: Arc<dyn Clock>,
}

impl<S> SocialService<S> {
    /// Create a service over the given social repository.
    pub fn new(social: Arc<S>, validator: Arc<RequestValidator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            social,
            validator,
            clock,
        }
    }
}

fn map_social_error(error: SocialRepositoryError, target: &str) -> Error {
    match error {
        SocialRepositoryError::Connection { message } => {
            Error::storage_unavailable(format!("social store unavailable: {message}"))
        }
        SocialRepositoryError::Query { message } => {
            Error::internal(format!("social store error: {message}"))
        }
        SocialRepositoryError::DuplicateLike => {
            Error::conflict(ConflictKind::DuplicateLike, format!("{target} already liked"))
        }
        SocialRepositoryError::TargetNotFound => Error::not_found(format!("{target} not found")),
        SocialRepositoryError::UserNotFound => Error::not_found("user not found"),
    }
}

#[async_trait]
impl<S> SocialCommand for SocialService<S>
where
    S: SocialRepository,
{
    async fn like(&self, user_id: &UserId, target: LikeTarget) -> Result<(), Error> {
        self.social
            .like(user_id, target, self.clock.utc())
            .await
            .map_err(|err| map_social_error(err, &target.to_string()))?;
        debug!(%user_id, %target, "liked");
        Ok(())
    }

    async fn unlike(&self, user_id: &UserId, target: LikeTarget) -> Result<(), Error> {
        let removed = self
            .social
            .unlike(user_id, target)
            .await
            .map_err(|err| map_social_error(err, &target.to_string()))?;
        if removed {
            debug!(%user_id, %target, "unliked");
            Ok(())
        } else {
            Err(Error::not_found(format!("no like on {target} to remove")))
        }
    }

    async fn add_review(&self, request: &ReviewRequest) -> Result<Review, Error> {
        let review = self.validator.review(request, self.clock.utc())?;
        let target = format!("workout {}", request.workout_id);
        self.social
            .add_review(&review)
            .await
            .map_err(|err| map_social_error(err, &target))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockSocialRepository;
    use crate::domain::{ErrorCode, ExerciseId, WorkoutId};
    use crate::test_support::{MutableClock, fixture_now};
    use rstest::rstest;

    fn service(social: MockSocialRepository) -> SocialService<MockSocialRepository> {
        SocialService::new(
            Arc::new(social),
            Arc::new(RequestValidator::default()),
            Arc::new(MutableClock::new(fixture_now())),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn like_stamps_the_clock_time() {
        let mut social = MockSocialRepository::new();
        social
            .expect_like()
            .withf(|_, _, liked_at| *liked_at == fixture_now())
            .times(1)
            .returning(|_, _, _| Ok(()));

        service(social)
            .like(&UserId::random(), LikeTarget::Workout(WorkoutId::random()))
            .await
            .expect("liked");
    }

    #[rstest]
    #[tokio::test]
    async fn second_like_is_a_duplicate_like_conflict() {
        let mut social = MockSocialRepository::new();
        social
            .expect_like()
            .returning(|_, _, _| Err(SocialRepositoryError::duplicate_like()));

        let error = service(social)
            .like(&UserId::random(), LikeTarget::Exercise(ExerciseId::random()))
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.conflict_kind(), Some(ConflictKind::DuplicateLike));
    }

    #[rstest]
    #[tokio::test]
    async fn liking_a_missing_target_is_not_found() {
        let mut social = MockSocialRepository::new();
        social
            .expect_like()
            .returning(|_, _, _| Err(SocialRepositoryError::target_not_found()));

        let error = service(social)
            .like(&UserId::random(), LikeTarget::Workout(WorkoutId::random()))
            .await
            .expect_err("missing target");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn unlike_requires_an_existing_like(
        #[case] existed: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut social = MockSocialRepository::new();
        social.expect_unlike().returning(move |_, _| Ok(existed));

        let result = service(social)
            .unlike(&UserId::random(), LikeTarget::Workout(WorkoutId::random()))
            .await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_review_never_reaches_storage() {
        let mut social = MockSocialRepository::new();
        social.expect_add_review().never();
        let request = ReviewRequest {
            workout_id: WorkoutId::random(),
            author: UserId::random(),
            rating: 9,
            title: "Great".into(),
            content: "Loved it".into(),
        };

        let error = service(social)
            .add_review(&request)
            .await
            .expect_err("rating out of range");

        assert_eq!(error.code(), ErrorCode::ValidationFailed);
    }

    #[rstest]
    #[tokio::test]
    async fn review_is_stored_with_clock_time() {
        let mut social = MockSocialRepository::new();
        social.expect_add_review().returning(|review| {
            Ok(Review {
                id: review.id,
                workout_id: review.workout_id,
                author: review.author.clone(),
                rating: review.rating,
                title: review.title.clone(),
                content: review.content.clone(),
                created_at: review.created_at,
            })
        });
        let request = ReviewRequest {
            workout_id: WorkoutId::random(),
            author: UserId::random(),
            rating: 5,
            title: " Great ".into(),
            content: "Loved it".into(),
        };

        let review = service(social)
            .add_review(&request)
            .await
            .expect("review stored");

        assert_eq!(review.title, "Great");
        assert_eq!(review.created_at, fixture_now());
        assert_eq!(review.rating.get(), 5);
    }
}
