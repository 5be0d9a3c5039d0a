//! Driven port for likes and reviews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{LikeTarget, NewReview, Review, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by social repository adapters.
    pub enum SocialRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "social repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "social repository query failed: {message}",
        /// The user already likes the target.
        DuplicateLike => "target already liked",
        /// The liked or reviewed item does not exist.
        TargetNotFound => "target not found",
        /// The acting user does not exist.
        UserNotFound => "user not found",
    }
}

/// Port for social writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Record a like; a second like by the same user is `DuplicateLike`.
    async fn like(
        &self,
        user_id: &UserId,
        target: LikeTarget,
        liked_at: DateTime<Utc>,
    ) -> Result<(), SocialRepositoryError>;

    /// Remove a like, returning whether one existed.
    async fn unlike(&self, user_id: &UserId, target: LikeTarget)
    -> Result<bool, SocialRepositoryError>;

    /// Append a review.
    async fn add_review(&self, review: &NewReview) -> Result<Review, SocialRepositoryError>;
}
