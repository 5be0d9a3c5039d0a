//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for accounts, the weight ledger,
//! the exercise/workout catalogue and its social layer, plus the services
//! that implement the driving ports on top of the driven ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode / ConflictKind: stable failure identifiers.
//! - RequestValidator: explicit validator handed to every service.
//! - OnboardingService, CredentialLoginService, WeightLedgerService,
//!   CatalogueService and SocialService: driving port implementations.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod invitation;
pub mod listing;
pub mod nutrition;
pub mod ports;
pub mod profile;
pub mod social;
pub mod user;
pub mod validation;
pub mod weight;

mod catalogue_service;
mod login_service;
mod onboarding_service;
mod social_service;
mod weight_ledger_service;

pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Password,
    PasswordHash,
};
pub use self::catalogue::{
    CatalogueValidationError, DURATION_MAX_SECS, Description, Exercise, ExerciseId, ItemName,
    NewExercise, NewWorkout, TagSet, TutorialLink, Workout, WorkoutDetail, WorkoutExercise,
    WorkoutExerciseEntry, WorkoutId, WorkoutPlan,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{ConflictKind, Error, ErrorCode, ErrorValidationError};
pub use self::invitation::{
    DEFAULT_INVITATION_TTL_HOURS, InvitationGrant, InvitationToken, TokenDigest,
};
pub use self::listing::{
    ExerciseSummary, LikeSummary, ListingQuery, ReviewSummary, SearchText, WorkoutSummary,
};
pub use self::login_service::CredentialLoginService;
pub use self::nutrition::NutritionGoals;
pub use self::onboarding_service::OnboardingService;
pub use self::profile::{
    Age, CurrentAttributes, Goal, HeightCm, ProfileAttributes, ProfileValidationError, WeightKg,
};
pub use self::social::{
    LikeTarget, LikeTargetKind, NewReview, Rating, Review, ReviewId, ReviewValidationError,
    ReviewWithAuthor,
};
pub use self::social_service::SocialService;
pub use self::user::{AccountStatus, Email, User, UserId, UserValidationError, Username};
pub use self::validation::{
    ListingRequest, NewExerciseRequest, NewWorkoutRequest, Registration, RegistrationRequest,
    RequestValidator, ReviewRequest, ValidationPolicy, WeightRequest, WorkoutExerciseRequest,
};
pub use self::weight::{WeightLogOutcome, WeightSample};
pub use self::weight_ledger_service::WeightLedgerService;

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use atomfit::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("no such workout"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
