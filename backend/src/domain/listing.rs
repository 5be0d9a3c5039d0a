//! Listing query model and aggregated result rows.
//!
//! A listing is a filtered, ranked window over exercises or workouts. Every
//! row carries social aggregates computed in the same round-trip as the
//! window, and the page reports the size of the whole filtered set.

use serde::Serialize;

use pagination::{PageRequest, SortDirection};

use super::catalogue::{Exercise, TagSet, Workout};
use super::user::UserId;

/// Maximum length of a free-text search term.
pub const SEARCH_MAX: usize = 100;

/// Case-insensitive substring search term; empty matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchText(String);

impl SearchText {
    /// Trim and bound a raw term, returning `None` when it is too long.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > SEARCH_MAX {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Whether the term filters nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Term with `LIKE` wildcards escaped using `\`.
    pub fn escaped_for_like(&self) -> String {
        let mut escaped = String::with_capacity(self.0.len());
        for ch in self.0.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped
    }
}

impl AsRef<str> for SearchText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated listing query shared by exercise and workout listings.
///
/// - `tags` empty ⇒ no tag filtering; non-empty ⇒ containment.
/// - `sort` orders by like count; ties fall back to ascending id.
/// - `viewer` drives the per-row `viewer_liked` flag.
/// - `owner` restricts the listing to one user's items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: SearchText,
    pub tags: TagSet,
    pub sort: SortDirection,
    pub page: PageRequest,
    pub viewer: Option<UserId>,
    pub owner: Option<UserId>,
}

/// Like aggregate for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSummary {
    /// Distinct users who like the item.
    pub like_count: u64,
    /// Whether the viewer is one of them; false without a viewer.
    pub viewer_liked: bool,
}

/// Review aggregate for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// Distinct users who reviewed the item.
    pub review_count: u64,
    /// Mean rating across reviews, `0.0` when there are none.
    pub average_rating: f64,
}

/// Exercise listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub exercise: Exercise,
    pub likes: LikeSummary,
}

/// Workout listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout: Workout,
    pub likes: LikeSummary,
    pub reviews: ReviewSummary,
}
