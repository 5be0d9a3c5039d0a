//! Explicitly constructed request validator.
//!
//! Raw request payloads arrive already deserialised but unchecked. A
//! [`RequestValidator`] built from a [`ValidationPolicy`] turns them into
//! validated domain values, failing with `validation_failed` and the name of
//! the offending field before any store access happens.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use pagination::{PageLimits, PageRequest, PaginationError, SortDirection};

use super::auth::{LoginCredentials, PASSWORD_MIN, Password};
use super::catalogue::{
    CatalogueValidationError, Description, ExerciseId, ItemName, NewExercise, NewWorkout, TagSet,
    TutorialLink, WorkoutExercise, WorkoutId, WorkoutPlan, checked_duration_secs,
};
use super::error::Error;
use super::listing::{ListingQuery, SEARCH_MAX, SearchText};
use super::profile::{Age, Goal, HeightCm, ProfileAttributes, WeightKg};
use super::social::{NewReview, REVIEW_TITLE_MAX, Rating, ReviewValidationError};
use super::user::{Email, UserId, Username};

/// Tunable limits applied by [`RequestValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Page size default and ceiling.
    pub page_limits: PageLimits,
    /// Minimum password length for new accounts.
    pub password_min: usize,
    /// Longest accepted review title, capped at [`REVIEW_TITLE_MAX`] since
    /// titles are stored as `VARCHAR(255)`.
    pub review_title_max: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            page_limits: PageLimits::default(),
            password_min: PASSWORD_MIN,
            review_title_max: REVIEW_TITLE_MAX,
        }
    }
}

/// Registration payload.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_male: bool,
    pub height_cm: i32,
    pub goal: String,
    pub weight_goal_kg: f64,
    pub age: i32,
    /// Starting weight, recorded as the first sample.
    pub weight_kg: f64,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_male", &self.is_male)
            .field("height_cm", &self.height_cm)
            .field("goal", &self.goal)
            .field("weight_goal_kg", &self.weight_goal_kg)
            .field("age", &self.age)
            .field("weight_kg", &self.weight_kg)
            .finish()
    }
}

/// Registration payload after validation, before hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub password: Password,
    pub attributes: ProfileAttributes,
    pub initial_weight: WeightKg,
}

/// Weight log payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRequest {
    pub user_id: UserId,
    pub weight_kg: f64,
}

/// Listing payload shared by exercise and workout listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingRequest {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub viewer: Option<UserId>,
    pub owner: Option<UserId>,
}

/// Exercise creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExerciseRequest {
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub is_duration: bool,
    pub duration_secs: i64,
    pub tutorial_link: Option<String>,
    pub muscles: Vec<String>,
}

/// One exercise slot in a workout creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseRequest {
    pub exercise_id: ExerciseId,
    pub duration_secs: i64,
}

/// Workout creation payload; slot order is workout order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkoutRequest {
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub tutorial_link: Option<String>,
    pub exercises: Vec<WorkoutExerciseRequest>,
}

/// Review payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub workout_id: WorkoutId,
    pub author: UserId,
    pub rating: i64,
    pub title: String,
    pub content: String,
}

/// Validator shared by the domain services.
///
/// Holds no mutable state; construct one per process and hand it to each
/// service behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    policy: ValidationPolicy,
}

impl RequestValidator {
    /// Build a validator for `policy`.
    pub fn new(mut policy: ValidationPolicy) -> Self {
        policy.review_title_max = policy.review_title_max.min(REVIEW_TITLE_MAX);
        Self { policy }
    }

    /// Policy in force.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate a registration payload.
    pub fn registration(&self, request: &RegistrationRequest) -> Result<Registration, Error> {
        let email = Email::new(&request.email).map_err(|err| field_error("email", err))?;
        let username =
            Username::new(request.username.as_str()).map_err(|err| field_error("username", err))?;
        let password = Password::with_min_length(&request.password, self.policy.password_min)
            .map_err(|err| field_error("password", err))?;
        let height = HeightCm::new(request.height_cm).map_err(|err| field_error("heightCm", err))?;
        let goal: Goal = request.goal.parse().map_err(|err| field_error("goal", err))?;
        let weight_goal =
            WeightKg::new(request.weight_goal_kg).map_err(|err| field_error("weightGoalKg", err))?;
        let age = Age::new(request.age).map_err(|err| field_error("age", err))?;
        let initial_weight =
            WeightKg::new(request.weight_kg).map_err(|err| field_error("weightKg", err))?;
        Ok(Registration {
            email,
            username,
            password,
            attributes: ProfileAttributes {
                is_male: request.is_male,
                height,
                goal,
                weight_goal,
                age,
            },
            initial_weight,
        })
    }

    /// Validate login input; any non-empty password is accepted here.
    pub fn credentials(&self, email: &str, password: &str) -> Result<LoginCredentials, Error> {
        LoginCredentials::try_from_parts(email, password)
            .map_err(|err| Error::unauthorized(format!("invalid credentials: {err}")))
    }

    /// Validate an email used to look up a pending account.
    pub fn email(&self, raw: &str) -> Result<Email, Error> {
        Email::new(raw).map_err(|err| field_error("email", err))
    }

    /// Validate a weight log.
    pub fn weight(&self, request: &WeightRequest) -> Result<WeightKg, Error> {
        WeightKg::new(request.weight_kg).map_err(|err| field_error("weightKg", err))
    }

    /// Validate raw paging parameters.
    pub fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Result<PageRequest, Error> {
        PageRequest::from_raw(limit, offset, self.policy.page_limits).map_err(pagination_error)
    }

    /// Validate a listing payload.
    pub fn listing(&self, request: &ListingRequest) -> Result<ListingQuery, Error> {
        let page = self.page(request.limit, request.offset)?;
        let sort = match request.sort.as_deref() {
            None => SortDirection::default(),
            Some(raw) => raw.parse().map_err(pagination_error)?,
        };
        let search = SearchText::new(request.search.as_deref().unwrap_or_default()).ok_or_else(
            || {
                Error::invalid_field(
                    "search",
                    format!("search must be at most {SEARCH_MAX} characters"),
                )
            },
        )?;
        let tags = TagSet::new(&request.tags).map_err(|err| field_error("tags", err))?;
        Ok(ListingQuery {
            search,
            tags,
            sort,
            page,
            viewer: request.viewer.clone(),
            owner: request.owner.clone(),
        })
    }

    /// Validate an exercise creation payload.
    pub fn new_exercise(
        &self,
        request: &NewExerciseRequest,
        created_at: DateTime<Utc>,
    ) -> Result<NewExercise, Error> {
        let name = ItemName::new(&request.name).map_err(|err| field_error("name", err))?;
        let description =
            Description::new(&request.description).map_err(|err| field_error("description", err))?;
        let tutorial_link = TutorialLink::parse_optional(request.tutorial_link.as_deref())
            .map_err(|err| field_error("tutorialLink", err))?;
        let duration_secs = checked_duration_secs(request.duration_secs)
            .map_err(|err| field_error("durationSecs", err))?;
        if request.is_duration && duration_secs == 0 {
            return Err(field_error(
                "durationSecs",
                CatalogueValidationError::DurationRequired,
            ));
        }
        let muscles = TagSet::new(&request.muscles).map_err(|err| field_error("muscles", err))?;
        Ok(NewExercise {
            id: ExerciseId::random(),
            owner: request.owner.clone(),
            name,
            description,
            is_duration: request.is_duration,
            duration_secs,
            tutorial_link,
            muscles,
            created_at,
        })
    }

    /// Validate a workout creation payload, rejecting repeated exercises.
    pub fn new_workout(
        &self,
        request: &NewWorkoutRequest,
        created_at: DateTime<Utc>,
    ) -> Result<NewWorkout, Error> {
        let name = ItemName::new(&request.name).map_err(|err| field_error("name", err))?;
        let description =
            Description::new(&request.description).map_err(|err| field_error("description", err))?;
        let tutorial_link = TutorialLink::parse_optional(request.tutorial_link.as_deref())
            .map_err(|err| field_error("tutorialLink", err))?;
        let slots = request
            .exercises
            .iter()
            .map(|slot| {
                checked_duration_secs(slot.duration_secs)
                    .map(|duration_secs| WorkoutExercise {
                        exercise_id: slot.exercise_id,
                        duration_secs,
                    })
                    .map_err(|err| field_error("exercises", err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let plan = WorkoutPlan::new(slots).map_err(|err| field_error("exercises", err))?;
        Ok(NewWorkout {
            id: WorkoutId::random(),
            owner: request.owner.clone(),
            name,
            description,
            tutorial_link,
            plan,
            created_at,
        })
    }

    /// Validate a review payload.
    pub fn review(
        &self,
        request: &ReviewRequest,
        created_at: DateTime<Utc>,
    ) -> Result<NewReview, Error> {
        if request.title.trim().chars().count() > self.policy.review_title_max {
            return Err(field_error(
                "title",
                ReviewValidationError::TitleTooLong {
                    max: self.policy.review_title_max,
                },
            ));
        }
        let rating = Rating::new(request.rating).map_err(|err| field_error("rating", err))?;
        NewReview::new(
            request.workout_id,
            request.author.clone(),
            rating,
            &request.title,
            &request.content,
            created_at,
        )
        .map_err(|err| {
            let field = match err {
                ReviewValidationError::EmptyContent
                | ReviewValidationError::ContentTooLong { .. } => "content",
                _ => "title",
            };
            field_error(field, err)
        })
    }
}

fn field_error(field: &str, err: impl fmt::Display) -> Error {
    Error::invalid_field(field, err.to_string())
}

fn pagination_error(err: PaginationError) -> Error {
    let field = match err {
        PaginationError::LimitOutOfRange { .. } | PaginationError::InvalidPolicy { .. } => "limit",
        PaginationError::NegativeOffset { .. } => "offset",
        PaginationError::UnknownSortDirection { .. } => "sort",
    };
    field_error(field, err)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DURATION_MAX_SECS, ErrorCode};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn validator() -> RequestValidator {
        RequestValidator::default()
    }

    fn registration() -> RegistrationRequest {
        RegistrationRequest {
            email: "Ada@Example.com".into(),
            username: "ada_l".into(),
            password: "correct horse".into(),
            is_male: false,
            height_cm: 170,
            goal: "maintain".into(),
            weight_goal_kg: 62.0,
            age: 36,
            weight_kg: 64.5,
        }
    }

    fn rejected_field(err: &Error) -> Option<&str> {
        err.details()
            .and_then(|details| details.get("field"))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    fn accepts_a_complete_registration(validator: RequestValidator) {
        let registration = validator
            .registration(&registration())
            .expect("valid registration");
        assert_eq!(registration.email.as_ref(), "ada@example.com");
        assert_eq!(registration.attributes.goal, Goal::Maintain);
        assert!((registration.initial_weight.get() - 64.5).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case::email(RegistrationRequest { email: "not-an-email".into(), ..registration() }, "email")]
    #[case::username(RegistrationRequest { username: "ada".into(), ..registration() }, "username")]
    #[case::password(RegistrationRequest { password: "short".into(), ..registration() }, "password")]
    #[case::height(RegistrationRequest { height_cm: 0, ..registration() }, "heightCm")]
    #[case::goal(RegistrationRequest { goal: "bulk".into(), ..registration() }, "goal")]
    #[case::weight_goal(RegistrationRequest { weight_goal_kg: f64::NAN, ..registration() }, "weightGoalKg")]
    #[case::age(RegistrationRequest { age: -3, ..registration() }, "age")]
    #[case::weight(RegistrationRequest { weight_kg: 0.0, ..registration() }, "weightKg")]
    fn registration_names_the_offending_field(
        validator: RequestValidator,
        #[case] request: RegistrationRequest,
        #[case] field: &str,
    ) {
        let err = validator.registration(&request).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(rejected_field(&err), Some(field));
    }

    #[rstest]
    fn password_minimum_follows_policy() {
        let validator = RequestValidator::new(ValidationPolicy {
            password_min: 16,
            ..ValidationPolicy::default()
        });
        let err = validator
            .registration(&registration())
            .expect_err("password below policy minimum");
        assert_eq!(rejected_field(&err), Some("password"));
    }

    #[rstest]
    fn registration_debug_redacts_password() {
        let rendered = format!("{:?}", registration());
        assert!(!rendered.contains("correct horse"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn listing_defaults_apply(validator: RequestValidator) {
        let query = validator
            .listing(&ListingRequest::default())
            .expect("defaults are valid");
        assert_eq!(query.page.limit(), 20);
        assert_eq!(query.page.offset(), 0);
        assert_eq!(query.sort, SortDirection::Desc);
        assert!(query.search.is_empty());
        assert!(query.tags.is_empty());
    }

    #[rstest]
    #[case::limit_zero(ListingRequest { limit: Some(0), ..ListingRequest::default() }, "limit")]
    #[case::limit_above_ceiling(ListingRequest { limit: Some(101), ..ListingRequest::default() }, "limit")]
    #[case::negative_offset(ListingRequest { offset: Some(-1), ..ListingRequest::default() }, "offset")]
    #[case::unknown_sort(ListingRequest { sort: Some("sideways".into()), ..ListingRequest::default() }, "sort")]
    #[case::blank_tag(ListingRequest { tags: vec![" ".into()], ..ListingRequest::default() }, "tags")]
    fn malformed_listing_fails_before_any_query(
        validator: RequestValidator,
        #[case] request: ListingRequest,
        #[case] field: &str,
    ) {
        let err = validator.listing(&request).expect_err("invalid listing");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(rejected_field(&err), Some(field));
    }

    #[rstest]
    fn listing_tags_are_normalised(validator: RequestValidator) {
        let request = ListingRequest {
            tags: vec!["Chest".into(), " triceps ".into(), "chest".into()],
            sort: Some("ASC".into()),
            ..ListingRequest::default()
        };
        let query = validator.listing(&request).expect("valid listing");
        assert_eq!(query.tags.to_vec(), vec!["chest", "triceps"]);
        assert_eq!(query.sort, SortDirection::Asc);
    }

    #[rstest]
    fn listing_request_deserialises_with_defaults() {
        let request: ListingRequest =
            serde_json::from_value(json!({ "search": "press", "limit": 5 })).expect("decode");
        assert_eq!(request.search.as_deref(), Some("press"));
        assert_eq!(request.limit, Some(5));
        assert!(request.tags.is_empty());
    }

    fn workout(exercises: Vec<WorkoutExerciseRequest>) -> NewWorkoutRequest {
        NewWorkoutRequest {
            owner: UserId::random(),
            name: "Push day".into(),
            description: "Chest and arms".into(),
            tutorial_link: None,
            exercises,
        }
    }

    #[rstest]
    fn duplicate_workout_exercise_is_rejected(validator: RequestValidator) {
        let exercise_id = ExerciseId::random();
        let slot = WorkoutExerciseRequest {
            exercise_id,
            duration_secs: 60,
        };
        let err = validator
            .new_workout(&workout(vec![slot.clone(), slot]), Utc::now())
            .expect_err("duplicate exercise");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(rejected_field(&err), Some("exercises"));
    }

    #[rstest]
    fn negative_slot_duration_is_rejected(validator: RequestValidator) {
        let slot = WorkoutExerciseRequest {
            exercise_id: ExerciseId::random(),
            duration_secs: -5,
        };
        let err = validator
            .new_workout(&workout(vec![slot]), Utc::now())
            .expect_err("negative duration");
        assert_eq!(rejected_field(&err), Some("exercises"));
    }

    fn timed_exercise(duration_secs: i64) -> NewExerciseRequest {
        NewExerciseRequest {
            owner: UserId::random(),
            name: "Plank".into(),
            description: "Hold".into(),
            is_duration: true,
            duration_secs,
            tutorial_link: None,
            muscles: vec!["core".into()],
        }
    }

    #[rstest]
    #[case::largest_storable(i64::from(DURATION_MAX_SECS), true)]
    #[case::one_past_storable(i64::from(DURATION_MAX_SECS) + 1, false)]
    #[case::beyond_u32(3_000_000_000, false)]
    #[case::beyond_u32_max(i64::from(u32::MAX) + 1, false)]
    fn exercise_durations_must_fit_storage(
        validator: RequestValidator,
        #[case] duration_secs: i64,
        #[case] accepted: bool,
    ) {
        let outcome = validator.new_exercise(&timed_exercise(duration_secs), Utc::now());

        match outcome {
            Ok(exercise) => {
                assert!(accepted, "{duration_secs} should be rejected");
                assert_eq!(i64::from(exercise.duration_secs), duration_secs);
            }
            Err(err) => {
                assert!(!accepted, "{duration_secs} should be accepted");
                assert_eq!(rejected_field(&err), Some("durationSecs"));
            }
        }
    }

    #[rstest]
    fn oversized_slot_duration_is_rejected(validator: RequestValidator) {
        let slot = WorkoutExerciseRequest {
            exercise_id: ExerciseId::random(),
            duration_secs: 3_000_000_000,
        };
        let err = validator
            .new_workout(&workout(vec![slot]), Utc::now())
            .expect_err("oversized duration");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(rejected_field(&err), Some("exercises"));
    }

    #[rstest]
    fn timed_exercise_needs_a_duration(validator: RequestValidator) {
        let request = NewExerciseRequest {
            owner: UserId::random(),
            name: "Plank".into(),
            description: "Hold".into(),
            is_duration: true,
            duration_secs: 0,
            tutorial_link: None,
            muscles: vec!["core".into()],
        };
        let err = validator
            .new_exercise(&request, Utc::now())
            .expect_err("missing duration");
        assert_eq!(rejected_field(&err), Some("durationSecs"));
    }

    fn review(rating: i64, title: &str, content: &str) -> ReviewRequest {
        ReviewRequest {
            workout_id: WorkoutId::random(),
            author: UserId::random(),
            rating,
            title: title.into(),
            content: content.into(),
        }
    }

    #[rstest]
    #[case::rating_low(review(0, "Solid", "Good"), "rating")]
    #[case::rating_high(review(6, "Solid", "Good"), "rating")]
    #[case::empty_title(review(4, " ", "Good"), "title")]
    #[case::empty_content(review(4, "Solid", ""), "content")]
    fn review_rules(
        validator: RequestValidator,
        #[case] request: ReviewRequest,
        #[case] field: &str,
    ) {
        let err = validator
            .review(&request, Utc::now())
            .expect_err("invalid review");
        assert_eq!(rejected_field(&err), Some(field));
    }

    #[rstest]
    fn review_title_limit_follows_policy() {
        let validator = RequestValidator::new(ValidationPolicy {
            review_title_max: 5,
            ..ValidationPolicy::default()
        });
        let err = validator
            .review(&review(5, "Too long", "Good"), Utc::now())
            .expect_err("title above policy maximum");
        assert_eq!(rejected_field(&err), Some("title"));
    }

    #[rstest]
    fn review_title_policy_cannot_outgrow_the_column() {
        let validator = RequestValidator::new(ValidationPolicy {
            review_title_max: 1_000,
            ..ValidationPolicy::default()
        });
        let mut request = review(5, "", "Good");
        request.title = "t".repeat(REVIEW_TITLE_MAX + 1);

        let err = validator
            .review(&request, Utc::now())
            .expect_err("title wider than the column");

        assert_eq!(validator.policy().review_title_max, REVIEW_TITLE_MAX);
        assert_eq!(rejected_field(&err), Some("title"));
        assert!(err.message().contains("at most 255"), "{}", err.message());
    }
}
