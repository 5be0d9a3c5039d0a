//! Driving port for likes and reviews.

use async_trait::async_trait;

use crate::domain::{Error, LikeTarget, Review, ReviewRequest, UserId};

/// Domain use-case port for social actions.
#[async_trait]
pub trait SocialCommand: Send + Sync {
    /// Like a target; liking twice is a `duplicate_like` conflict.
    async fn like(&self, user_id: &UserId, target: LikeTarget) -> Result<(), Error>;

    /// Remove a like; removing a missing like is `not_found`.
    async fn unlike(&self, user_id: &UserId, target: LikeTarget) -> Result<(), Error>;

    /// Append a review to a workout.
    async fn add_review(&self, request: &ReviewRequest) -> Result<Review, Error>;
}
