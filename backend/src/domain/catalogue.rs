//! Exercise and workout catalogue entities.
//!
//! Exercises carry an unordered set of muscle tags used for containment
//! filtering. Workouts are an ordered list of exercise references, each with
//! its own duration; a workout may reference a given exercise at most once.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Maximum length of exercise and workout names.
pub const NAME_MAX: usize = 255;
/// Maximum length of descriptions.
pub const DESCRIPTION_MAX: usize = 4000;
/// Maximum length of a single muscle tag.
pub const TAG_MAX: usize = 50;
/// Maximum number of tags on an exercise or in a filter.
pub const TAGS_MAX: usize = 20;
/// Maximum number of exercises in one workout.
pub const WORKOUT_EXERCISES_MAX: usize = 50;
/// Longest duration, in seconds, an exercise or workout slot may carry.
///
/// Durations are stored as 32-bit signed integers.
pub const DURATION_MAX_SECS: u32 = 2_147_483_647;

/// Validation errors raised by catalogue value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyDescription,
    DescriptionTooLong { max: usize },
    InvalidTutorialLink,
    EmptyTag,
    TagTooLong { max: usize },
    TooManyTags { max: usize },
    NegativeDuration,
    DurationTooLong { max: u32 },
    DurationRequired,
    NoExercises,
    TooManyExercises { max: usize },
    DuplicateExercise { exercise_id: ExerciseId },
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::InvalidTutorialLink => {
                write!(f, "tutorial link must be an http or https URL")
            }
            Self::EmptyTag => write!(f, "tags must not be empty"),
            Self::TagTooLong { max } => write!(f, "tags must be at most {max} characters"),
            Self::TooManyTags { max } => write!(f, "at most {max} tags are allowed"),
            Self::NegativeDuration => write!(f, "duration must not be negative"),
            Self::DurationTooLong { max } => {
                write!(f, "duration must be at most {max} seconds")
            }
            Self::DurationRequired => write!(f, "duration must be positive"),
            Self::NoExercises => write!(f, "a workout needs at least one exercise"),
            Self::TooManyExercises { max } => {
                write!(f, "a workout may contain at most {max} exercises")
            }
            Self::DuplicateExercise { exercise_id } => {
                write!(f, "exercise {exercise_id} appears more than once")
            }
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

/// Check a raw duration in seconds against the accepted range.
pub fn checked_duration_secs(raw: i64) -> Result<u32, CatalogueValidationError> {
    let secs = u32::try_from(raw).map_err(|_| {
        if raw < 0 {
            CatalogueValidationError::NegativeDuration
        } else {
            CatalogueValidationError::DurationTooLong {
                max: DURATION_MAX_SECS,
            }
        }
    })?;
    if secs > DURATION_MAX_SECS {
        return Err(CatalogueValidationError::DurationTooLong {
            max: DURATION_MAX_SECS,
        });
    }
    Ok(secs)
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an identifier read back from storage.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier supplied by a caller.
            pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(raw.trim()).map(Self)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_identifier! {
    /// Stable exercise identifier.
    ExerciseId
}

uuid_identifier! {
    /// Stable workout identifier.
    WorkoutId
}

/// Trimmed, non-empty name of at most [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Validate a catalogue item name.
    pub fn new(raw: &str) -> Result<Self, CatalogueValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogueValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(CatalogueValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Trimmed, non-empty free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// Validate a description.
    pub fn new(raw: &str) -> Result<Self, CatalogueValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogueValidationError::EmptyDescription);
        }
        if trimmed.chars().count() > DESCRIPTION_MAX {
            return Err(CatalogueValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Optional link to a tutorial video or article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TutorialLink(String);

impl TutorialLink {
    /// Accept an absolute `http`/`https` link; blank input means "no link".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, CatalogueValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        let has_scheme = ["http://", "https://"]
            .iter()
            .any(|scheme| trimmed.len() > scheme.len() && trimmed.starts_with(scheme));
        if !has_scheme || trimmed.chars().any(char::is_whitespace) {
            return Err(CatalogueValidationError::InvalidTutorialLink);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for TutorialLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Unordered set of normalised (trimmed, lower-cased) labels.
///
/// Used both for an exercise's muscles and for listing filters. An empty
/// filter set matches everything; a non-empty one requires containment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Normalise and deduplicate raw labels.
    pub fn new<I, S>(raw: I) -> Result<Self, CatalogueValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = BTreeSet::new();
        for value in raw {
            let tag = value.as_ref().trim().to_lowercase();
            if tag.is_empty() {
                return Err(CatalogueValidationError::EmptyTag);
            }
            if tag.chars().count() > TAG_MAX {
                return Err(CatalogueValidationError::TagTooLong { max: TAG_MAX });
            }
            tags.insert(tag);
        }
        if tags.len() > TAGS_MAX {
            return Err(CatalogueValidationError::TooManyTags { max: TAGS_MAX });
        }
        Ok(Self(tags))
    }

    /// Whether no labels are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every label in `other` is also in `self`.
    pub fn contains_all(&self, other: &Self) -> bool {
        other.0.is_subset(&self.0)
    }

    /// Labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels as owned strings, for array binds.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Exercise stored in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: ExerciseId,
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub is_duration: bool,
    pub duration_secs: u32,
    pub tutorial_link: Option<String>,
    pub muscles: TagSet,
    pub created_at: DateTime<Utc>,
}

/// Validated exercise ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub id: ExerciseId,
    pub owner: UserId,
    pub name: ItemName,
    pub description: Description,
    pub is_duration: bool,
    pub duration_secs: u32,
    pub tutorial_link: Option<TutorialLink>,
    pub muscles: TagSet,
    pub created_at: DateTime<Utc>,
}

/// Workout header stored in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub tutorial_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One exercise slot in a workout being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseId,
    pub duration_secs: u32,
}

/// Ordered exercise slots with no repeated exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPlan(Vec<WorkoutExercise>);

impl WorkoutPlan {
    /// Validate slot order, count, durations and uniqueness.
    pub fn new(slots: Vec<WorkoutExercise>) -> Result<Self, CatalogueValidationError> {
        if slots.is_empty() {
            return Err(CatalogueValidationError::NoExercises);
        }
        if slots.len() > WORKOUT_EXERCISES_MAX {
            return Err(CatalogueValidationError::TooManyExercises {
                max: WORKOUT_EXERCISES_MAX,
            });
        }
        let mut seen = BTreeSet::new();
        for slot in &slots {
            if slot.duration_secs == 0 {
                return Err(CatalogueValidationError::DurationRequired);
            }
            if slot.duration_secs > DURATION_MAX_SECS {
                return Err(CatalogueValidationError::DurationTooLong {
                    max: DURATION_MAX_SECS,
                });
            }
            if !seen.insert(slot.exercise_id) {
                return Err(CatalogueValidationError::DuplicateExercise {
                    exercise_id: slot.exercise_id,
                });
            }
        }
        Ok(Self(slots))
    }

    /// Slots in workout order.
    pub fn slots(&self) -> &[WorkoutExercise] {
        &self.0
    }
}

/// Validated workout ready to be stored with its exercise links.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub id: WorkoutId,
    pub owner: UserId,
    pub name: ItemName,
    pub description: Description,
    pub tutorial_link: Option<TutorialLink>,
    pub plan: WorkoutPlan,
    pub created_at: DateTime<Utc>,
}

/// Exercise link as read back with a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseEntry {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub position: u32,
    pub duration_secs: u32,
}

/// Workout with its ordered exercise links.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseEntry>,
}
