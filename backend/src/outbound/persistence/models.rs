//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to domain types live beside
//! the adapters that need them.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Double, Int2, Nullable, Timestamptz, Uuid as SqlUuid};
use uuid::Uuid;

use super::schema::{
    exercises, invitations, user_attributes, user_weights, users, workout_exercises,
    workout_reviews, workouts,
};

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// The users columns a sign-in needs.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub password_hash: String,
    pub is_active: bool,
}

/// Insertable struct for creating pending accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the user_attributes table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAttributesRow {
    pub user_id: Uuid,
    pub is_male: bool,
    pub height_cm: i32,
    pub goal: String,
    pub weight_goal_kg: f64,
    pub age: i32,
}

/// Row struct for the user_weights table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_weights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserWeightRow {
    pub user_id: Uuid,
    pub recorded_on: NaiveDate,
    pub weight_kg: f64,
}

/// Insertable struct for the invitations table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub(crate) struct NewInvitationRow<'a> {
    pub token_digest: &'a str,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

/// Row struct for the exercises table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = exercises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExerciseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_duration: bool,
    pub duration_secs: i32,
    pub tutorial_link: Option<String>,
    pub muscles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the workouts table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = workouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkoutRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub tutorial_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for workout exercise links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workout_exercises)]
pub(crate) struct NewWorkoutExerciseRow {
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub duration_secs: i32,
}

/// Workout exercise link joined with the exercise name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct WorkoutExerciseEntryRow {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub position: i32,
    pub duration_secs: i32,
}

// ---------------------------------------------------------------------------
// Social models
// ---------------------------------------------------------------------------

/// Row struct for the workout_reviews table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = workout_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Listing models
// ---------------------------------------------------------------------------
//
// Listing queries return one row per item plus the filtered total. When the
// window is past the end of the result set a single row comes back with
// only `total_count` populated, so every item column is nullable.

/// Exercise listing row.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ExerciseListingRow {
    #[diesel(sql_type = BigInt)]
    pub total_count: i64,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub id: Option<Uuid>,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub user_id: Option<Uuid>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub is_duration: Option<bool>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Integer>)]
    pub duration_secs: Option<i32>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub tutorial_link: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Array<diesel::sql_types::Text>>)]
    pub muscles: Option<Vec<String>>,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub created_at: Option<DateTime<Utc>>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub like_count: Option<i64>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub viewer_liked: Option<bool>,
}

/// Workout listing row.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct WorkoutListingRow {
    #[diesel(sql_type = BigInt)]
    pub total_count: i64,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub id: Option<Uuid>,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub user_id: Option<Uuid>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub tutorial_link: Option<String>,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub created_at: Option<DateTime<Utc>>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub like_count: Option<i64>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub viewer_liked: Option<bool>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub review_count: Option<i64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub average_rating: Option<f64>,
}

/// Review listing row joined with the author's username.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ReviewListingRow {
    #[diesel(sql_type = BigInt)]
    pub total_count: i64,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub id: Option<Uuid>,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub workout_id: Option<Uuid>,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub user_id: Option<Uuid>,
    #[diesel(sql_type = Nullable<Int2>)]
    pub rating: Option<i16>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub title: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub content: Option<String>,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub created_at: Option<DateTime<Utc>>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Text>)]
    pub username: Option<String>,
}
