//! Operator CLI for the atomfit backend.
//!
//! Applies migrations and drives the onboarding, weight ledger, catalogue
//! and social services against the configured database. Settings come from
//! `ATOMFIT_*` variables; results are printed as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use atomfit::config::AppSettings;
use atomfit::domain::ports::{
    CatalogueCommand, CatalogueQuery, LoginService, SocialCommand, UserOnboarding, WeightLedger,
};
use atomfit::domain::{
    CatalogueService, CredentialLoginService, ExerciseId, LikeTarget, ListingRequest,
    LoginCredentials, NewExerciseRequest, NewWorkoutRequest, OnboardingService,
    RegistrationRequest, RequestValidator, ReviewRequest, SocialService, UserId,
    WeightLedgerService, WeightRequest, WorkoutExerciseRequest, WorkoutId,
};
use atomfit::outbound::credentials::Argon2PasswordHasher;
use atomfit::outbound::mail::LoggingInvitationMailer;
use atomfit::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCatalogueRepository, DieselListingRepository,
    DieselSocialRepository, DieselWeightRepository, run_migrations_async,
};
use atomfit::telemetry::init_tracing;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;

/// `atomfit-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "atomfit-admin",
    about = "Administer atomfit accounts, weights and the catalogue",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Register a pending account and send its invitation.
    Register(RegisterArgs),
    /// Redeem an invitation token.
    Activate {
        /// Token from the activation link.
        token: String,
    },
    /// Replace the invitation of a pending account.
    Reinvite {
        /// Email of the pending account.
        email: String,
    },
    /// Check a password against an active account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Record today's weight for a user.
    LogWeight {
        #[arg(long, value_parser = parse_user_id)]
        user: UserId,
        #[arg(long = "kg")]
        weight_kg: f64,
    },
    /// Show a user's weight history, newest first.
    WeightHistory {
        #[arg(long, value_parser = parse_user_id)]
        user: UserId,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Show a user's current attributes and nutrition targets.
    Nutrition {
        #[arg(long, value_parser = parse_user_id)]
        user: UserId,
    },
    /// Create an exercise.
    CreateExercise(CreateExerciseArgs),
    /// Create a workout from existing exercises.
    CreateWorkout(CreateWorkoutArgs),
    /// List exercises with like counts.
    ListExercises(ListingArgs),
    /// List workouts with like and review aggregates.
    ListWorkouts(ListingArgs),
    /// List reviews of a workout, newest first.
    Reviews {
        #[arg(long, value_parser = parse_workout_id)]
        workout: WorkoutId,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Like an exercise or workout.
    Like(LikeArgs),
    /// Withdraw a like.
    Unlike(LikeArgs),
    /// Review a workout.
    Review {
        #[arg(long, value_parser = parse_workout_id)]
        workout: WorkoutId,
        #[arg(long, value_parser = parse_user_id)]
        user: UserId,
        #[arg(long)]
        rating: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    male: bool,
    #[arg(long = "height-cm")]
    height_cm: i32,
    /// `lose`, `maintain` or `gain`.
    #[arg(long)]
    goal: String,
    #[arg(long = "weight-goal-kg")]
    weight_goal_kg: f64,
    #[arg(long)]
    age: i32,
    #[arg(long = "weight-kg")]
    weight_kg: f64,
}

#[derive(Debug, Args)]
struct WindowArgs {
    #[arg(long)]
    limit: Option<i64>,
    #[arg(long)]
    offset: Option<i64>,
}

#[derive(Debug, Args)]
struct ListingArgs {
    #[arg(long)]
    search: Option<String>,
    /// Muscle tag the item must carry; repeat to require several.
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// `asc` or `desc` by like count.
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, value_parser = parse_user_id)]
    owner: Option<UserId>,
    /// User whose likes are reported as `viewerLiked`.
    #[arg(long, value_parser = parse_user_id)]
    viewer: Option<UserId>,
    #[command(flatten)]
    window: WindowArgs,
}

#[derive(Debug, Args)]
struct CreateExerciseArgs {
    #[arg(long, value_parser = parse_user_id)]
    owner: UserId,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    /// Timed exercise rather than repetitions.
    #[arg(long)]
    timed: bool,
    #[arg(long = "duration-secs", default_value_t = 0)]
    duration_secs: i64,
    #[arg(long = "tutorial-link")]
    tutorial_link: Option<String>,
    #[arg(long = "muscle")]
    muscles: Vec<String>,
}

#[derive(Debug, Args)]
struct CreateWorkoutArgs {
    #[arg(long, value_parser = parse_user_id)]
    owner: UserId,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long = "tutorial-link")]
    tutorial_link: Option<String>,
    /// Ordered `exercise-id:duration-secs` entries.
    #[arg(long = "exercise", value_parser = parse_workout_entry, required = true)]
    exercises: Vec<WorkoutExerciseRequest>,
}

#[derive(Debug, Args)]
struct LikeArgs {
    #[arg(long, value_parser = parse_user_id)]
    user: UserId,
    #[arg(long, value_parser = parse_exercise_id, conflicts_with = "workout", required_unless_present = "workout")]
    exercise: Option<ExerciseId>,
    #[arg(long, value_parser = parse_workout_id)]
    workout: Option<WorkoutId>,
}

impl LikeArgs {
    fn target(&self) -> Result<LikeTarget> {
        match (self.exercise, self.workout) {
            (Some(id), None) => Ok(LikeTarget::Exercise(id)),
            (None, Some(id)) => Ok(LikeTarget::Workout(id)),
            _ => Err(eyre!("exactly one of --exercise or --workout is required")),
        }
    }
}

struct Services {
    onboarding:
        OnboardingService<DieselAccountRepository, Argon2PasswordHasher, LoggingInvitationMailer>,
    login: CredentialLoginService<DieselAccountRepository, Argon2PasswordHasher>,
    weights: WeightLedgerService<DieselWeightRepository>,
    catalogue: CatalogueService<DieselCatalogueRepository, DieselListingRepository>,
    social: SocialService<DieselSocialRepository>,
}

impl Services {
    fn wire(settings: &AppSettings, pool: DbPool) -> Result<Self> {
        let validator = Arc::new(RequestValidator::new(settings.validation_policy()?));
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let mailer = Arc::new(LoggingInvitationMailer::new(
            settings.activation_base_url(),
        ));

        Ok(Self {
            onboarding: OnboardingService::new(
                Arc::clone(&accounts),
                Arc::clone(&hasher),
                mailer,
                Arc::clone(&validator),
                Arc::clone(&clock),
            )
            .with_invitation_ttl(settings.invitation_ttl()?),
            login: CredentialLoginService::new(accounts, hasher),
            weights: WeightLedgerService::new(
                Arc::new(DieselWeightRepository::new(pool.clone())),
                Arc::clone(&validator),
                Arc::clone(&clock),
            ),
            catalogue: CatalogueService::new(
                Arc::new(DieselCatalogueRepository::new(pool.clone())),
                Arc::new(DieselListingRepository::new(pool.clone())),
                Arc::clone(&validator),
                Arc::clone(&clock),
            ),
            social: SocialService::new(Arc::new(DieselSocialRepository::new(pool)), validator, clock),
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = load_settings()?;
    if let Err(err) = init_tracing(settings.log_format()) {
        warn!(error = %err, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args.command, settings))
}

/// Only the environment and config files feed settings; the subcommand line
/// belongs to clap.
fn load_settings() -> Result<AppSettings> {
    AppSettings::load_from_iter([OsString::from("atomfit-admin")])
        .map_err(|err| eyre!("failed to load settings: {err}"))
}

async fn run(command: Command, settings: AppSettings) -> Result<()> {
    let database_url = settings.database_url()?;
    if matches!(command, Command::Migrate) {
        let applied = run_migrations_async(database_url).await?;
        return print_json(&serde_json::json!({ "applied": applied }));
    }

    let pool = DbPool::new(settings.pool_config()?)
        .await
        .wrap_err("failed to create database pool")?;
    let services = Services::wire(&settings, pool)?;
    dispatch(command, &services).await
}

async fn dispatch(command: Command, services: &Services) -> Result<()> {
    match command {
        Command::Migrate => Ok(()),
        Command::Register(args) => {
            let receipt = services.onboarding.register(&args.into_request()).await?;
            print_json(&serde_json::json!({
                "userId": receipt.user.id(),
                "status": receipt.user.status(),
                "invitationExpiresAt": receipt.invitation.expires_at,
            }))
        }
        Command::Activate { token } => {
            let user_id = services.onboarding.activate(&token).await?;
            print_json(&serde_json::json!({ "activated": user_id }))
        }
        Command::Reinvite { email } => {
            let invitation = services.onboarding.reissue_invitation(&email).await?;
            print_json(&serde_json::json!({
                "userId": invitation.user_id,
                "invitationExpiresAt": invitation.expires_at,
            }))
        }
        Command::Login { email, password } => {
            let credentials = LoginCredentials::try_from_parts(&email, &password)
                .map_err(|err| eyre!("invalid credentials: {err}"))?;
            let user_id = services.login.authenticate(&credentials).await?;
            print_json(&serde_json::json!({ "userId": user_id }))
        }
        Command::LogWeight { user, weight_kg } => {
            let outcome = services
                .weights
                .log_weight(&WeightRequest {
                    user_id: user,
                    weight_kg,
                })
                .await?;
            print_json(&serde_json::json!({ "outcome": outcome }))
        }
        Command::WeightHistory { user, window } => {
            let page = services
                .weights
                .history(&user, window.limit, window.offset)
                .await?;
            print_json(&page)
        }
        Command::Nutrition { user } => {
            let goals = services.weights.nutrition_goals(&user).await?;
            print_json(&goals)
        }
        Command::CreateExercise(args) => {
            let exercise = services
                .catalogue
                .create_exercise(&args.into_request())
                .await?;
            print_json(&exercise)
        }
        Command::CreateWorkout(args) => {
            let detail = services
                .catalogue
                .create_workout(&args.into_request())
                .await?;
            print_json(&detail)
        }
        Command::ListExercises(args) => {
            let page = services
                .catalogue
                .list_exercises(&args.into_request())
                .await?;
            print_json(&page)
        }
        Command::ListWorkouts(args) => {
            let page = services
                .catalogue
                .list_workouts(&args.into_request())
                .await?;
            print_json(&page)
        }
        Command::Reviews { workout, window } => {
            let page = services
                .catalogue
                .reviews_for_workout(&workout, window.limit, window.offset)
                .await?;
            print_json(&page)
        }
        Command::Like(args) => {
            services.social.like(&args.user, args.target()?).await?;
            print_json(&serde_json::json!({ "liked": true }))
        }
        Command::Unlike(args) => {
            services.social.unlike(&args.user, args.target()?).await?;
            print_json(&serde_json::json!({ "liked": false }))
        }
        Command::Review {
            workout,
            user,
            rating,
            title,
            content,
        } => {
            let review = services
                .social
                .add_review(&ReviewRequest {
                    workout_id: workout,
                    author: user,
                    rating,
                    title,
                    content,
                })
                .await?;
            print_json(&review)
        }
    }
}

impl RegisterArgs {
    fn into_request(self) -> RegistrationRequest {
        RegistrationRequest {
            email: self.email,
            username: self.username,
            password: self.password,
            is_male: self.male,
            height_cm: self.height_cm,
            goal: self.goal,
            weight_goal_kg: self.weight_goal_kg,
            age: self.age,
            weight_kg: self.weight_kg,
        }
    }
}

impl ListingArgs {
    fn into_request(self) -> ListingRequest {
        ListingRequest {
            search: self.search,
            tags: self.tags,
            sort: self.sort,
            limit: self.window.limit,
            offset: self.window.offset,
            viewer: self.viewer,
            owner: self.owner,
        }
    }
}

impl CreateExerciseArgs {
    fn into_request(self) -> NewExerciseRequest {
        NewExerciseRequest {
            owner: self.owner,
            name: self.name,
            description: self.description,
            is_duration: self.timed,
            duration_secs: self.duration_secs,
            tutorial_link: self.tutorial_link,
            muscles: self.muscles,
        }
    }
}

impl CreateWorkoutArgs {
    fn into_request(self) -> NewWorkoutRequest {
        NewWorkoutRequest {
            owner: self.owner,
            name: self.name,
            description: self.description,
            tutorial_link: self.tutorial_link,
            exercises: self.exercises,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn parse_user_id(raw: &str) -> Result<UserId, String> {
    UserId::new(raw).map_err(|err| err.to_string())
}

fn parse_exercise_id(raw: &str) -> Result<ExerciseId, String> {
    ExerciseId::parse(raw).map_err(|err| format!("invalid exercise id: {err}"))
}

fn parse_workout_id(raw: &str) -> Result<WorkoutId, String> {
    WorkoutId::parse(raw).map_err(|err| format!("invalid workout id: {err}"))
}

fn parse_workout_entry(raw: &str) -> Result<WorkoutExerciseRequest, String> {
    let (id, duration) = raw
        .split_once(':')
        .ok_or_else(|| "expected `exercise-id:duration-secs`".to_owned())?;
    let duration_secs = duration
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid duration: {err}"))?;
    Ok(WorkoutExerciseRequest {
        exercise_id: parse_exercise_id(id)?,
        duration_secs,
    })
}
