//! Likes and reviews.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalogue::{ExerciseId, WorkoutId};
use super::user::{UserId, Username};

/// Maximum length of a review title.
pub const REVIEW_TITLE_MAX: usize = 255;
/// Maximum length of a review body.
pub const REVIEW_CONTENT_MAX: usize = 10_000;

/// Validation errors raised by review value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    RatingOutOfRange { value: i64 },
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooLong { max: usize },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { value } => {
                write!(f, "rating must be between 1 and 5; got {value}")
            }
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "content must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Kind of catalogue item a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeTargetKind {
    Exercise,
    Workout,
}

/// Catalogue item a user can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Exercise(ExerciseId),
    Workout(WorkoutId),
}

impl LikeTarget {
    /// Which table family the target lives in.
    pub fn kind(self) -> LikeTargetKind {
        match self {
            Self::Exercise(_) => LikeTargetKind::Exercise,
            Self::Workout(_) => LikeTargetKind::Workout,
        }
    }

    /// Raw identifier of the target.
    pub fn as_uuid(&self) -> &Uuid {
        match self {
            Self::Exercise(id) => id.as_uuid(),
            Self::Workout(id) => id.as_uuid(),
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exercise(id) => write!(f, "exercise {id}"),
            Self::Workout(id) => write!(f, "workout {id}"),
        }
    }
}

/// Star rating between one and five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validate a rating.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (1..=5).contains(rating))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange { value })
    }

    /// Stars as an integer.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// Validated review ready to be stored.
///
/// Reviews are append-only: a user may review the same workout more than
/// once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub id: ReviewId,
    pub workout_id: WorkoutId,
    pub author: UserId,
    pub rating: Rating,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewReview {
    /// Validate title and content around an already-validated rating.
    pub fn new(
        workout_id: WorkoutId,
        author: UserId,
        rating: Rating,
        title: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReviewValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ReviewValidationError::EmptyTitle);
        }
        if title.chars().count() > REVIEW_TITLE_MAX {
            return Err(ReviewValidationError::TitleTooLong {
                max: REVIEW_TITLE_MAX,
            });
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ReviewValidationError::EmptyContent);
        }
        if content.chars().count() > REVIEW_CONTENT_MAX {
            return Err(ReviewValidationError::ContentTooLong {
                max: REVIEW_CONTENT_MAX,
            });
        }
        Ok(Self {
            id: ReviewId::random(),
            workout_id,
            author,
            rating,
            title: title.to_owned(),
            content: content.to_owned(),
            created_at,
        })
    }
}

/// Stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub workout_id: WorkoutId,
    pub author: UserId,
    pub rating: Rating,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    pub review: Review,
    pub author_username: Username,
}
