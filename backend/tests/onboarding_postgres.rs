//! Onboarding and login against embedded PostgreSQL.
//!
//! Drives `OnboardingService` and `CredentialLoginService` over the Diesel
//! account adapter so the transactional guarantees are checked end to end:
//! registration is all-or-nothing and invitations redeem at most once.

use std::sync::Arc;

use atomfit::domain::ports::{FixtureInvitationMailer, LoginService, UserOnboarding};
use atomfit::domain::{
    AccountStatus, ConflictKind, CredentialLoginService, ErrorCode, LoginCredentials,
    OnboardingService, RequestValidator,
};
use atomfit::outbound::credentials::Argon2PasswordHasher;
use atomfit::outbound::persistence::DieselAccountRepository;
use chrono::TimeDelta;
use mockable::Clock;
use rstest::{fixture, rstest};

mod support;

use support::{
    Harness, SteppingClock, count_rows, handle_cluster_setup_failure, provision, registration,
    suite_start,
};

type Onboarding =
    OnboardingService<DieselAccountRepository, Argon2PasswordHasher, FixtureInvitationMailer>;

struct TestContext {
    harness: Harness,
    clock: Arc<SteppingClock>,
    onboarding: Onboarding,
    login: CredentialLoginService<DieselAccountRepository, Argon2PasswordHasher>,
}

impl TestContext {
    fn count(&self, table: &str) -> i64 {
        count_rows(
            &self.harness.database_url,
            &format!("SELECT COUNT(*) FROM {table}"),
        )
        .expect("count rows")
    }

    fn login(&self, email: &str) -> Result<atomfit::domain::UserId, atomfit::domain::Error> {
        let credentials =
            LoginCredentials::try_from_parts(email, "correct horse battery").expect("credentials");
        self.harness
            .runtime
            .block_on(self.login.authenticate(&credentials))
    }
}

fn setup_context() -> Result<TestContext, String> {
    let harness = provision("atomfit_onboarding", 4)?;
    let clock = Arc::new(SteppingClock::new(suite_start()));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let accounts = Arc::new(DieselAccountRepository::new(harness.pool.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let validator = Arc::new(RequestValidator::default());

    let onboarding = OnboardingService::new(
        Arc::clone(&accounts),
        Arc::clone(&hasher),
        Arc::new(FixtureInvitationMailer),
        validator,
        dyn_clock,
    )
    .with_invitation_ttl(TimeDelta::hours(24));
    let login = CredentialLoginService::new(accounts, hasher);

    Ok(TestContext {
        harness,
        clock,
        onboarding,
        login,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn registration_creates_a_pending_account_that_activation_enables(
    context: Option<TestContext>,
) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: registration_creates_a_pending_account skipped");
        return;
    };
    let runtime = &context.harness.runtime;

    let receipt = runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("register");

    assert_eq!(receipt.user.status(), AccountStatus::Pending);
    assert_eq!(context.count("users"), 1);
    assert_eq!(context.count("user_attributes"), 1);
    assert_eq!(context.count("user_weights"), 1);
    assert_eq!(context.count("invitations"), 1);
    let pending = context.login("ada@example.com").expect_err("pending");
    assert_eq!(pending.code(), ErrorCode::Unauthorized);

    let activated = runtime
        .block_on(
            context
                .onboarding
                .activate(receipt.invitation.token.expose()),
        )
        .expect("activate");

    assert_eq!(&activated, receipt.user.id());
    assert_eq!(context.count("invitations"), 0);
    assert_eq!(context.login("ada@example.com").expect("login"), activated);
}

#[rstest]
#[case::email(registration("ada").email, "someone_else", ConflictKind::DuplicateEmail)]
#[case::username("other@example.com".to_owned(), "ada", ConflictKind::DuplicateUsername)]
fn duplicate_identity_leaves_no_partial_rows(
    context: Option<TestContext>,
    #[case] email: String,
    #[case] username: &str,
    #[case] expected: ConflictKind,
) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_identity_leaves_no_partial_rows skipped");
        return;
    };
    let runtime = &context.harness.runtime;
    runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("first registration");

    let mut clash = registration(username);
    clash.email = email;
    let error = runtime
        .block_on(context.onboarding.register(&clash))
        .expect_err("conflict");

    assert_eq!(error.conflict_kind(), Some(expected));
    for table in ["users", "user_attributes", "user_weights", "invitations"] {
        assert_eq!(context.count(table), 1, "{table} gained a row");
    }
}

#[rstest]
fn invitation_tokens_redeem_once(context: Option<TestContext>) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: invitation_tokens_redeem_once skipped");
        return;
    };
    let runtime = &context.harness.runtime;
    let receipt = runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("register");
    let token = receipt.invitation.token.expose().to_owned();

    runtime
        .block_on(context.onboarding.activate(&token))
        .expect("first activation");
    let replay = runtime
        .block_on(context.onboarding.activate(&token))
        .expect_err("replayed token");

    assert_eq!(replay.code(), ErrorCode::InvalidOrExpiredToken);
}

#[rstest]
#[case::never_issued("never-issued-token")]
#[case::blank("   ")]
fn unknown_tokens_are_rejected(context: Option<TestContext>, #[case] token: &str) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_tokens_are_rejected skipped");
        return;
    };

    let error = context
        .harness
        .runtime
        .block_on(context.onboarding.activate(token))
        .expect_err("unknown token");

    assert_eq!(error.code(), ErrorCode::InvalidOrExpiredToken);
}

#[rstest]
fn expired_invitation_leaves_the_account_pending(context: Option<TestContext>) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: expired_invitation_leaves_the_account_pending skipped");
        return;
    };
    let runtime = &context.harness.runtime;
    let receipt = runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("register");

    context.clock.advance(TimeDelta::hours(24));
    let error = runtime
        .block_on(
            context
                .onboarding
                .activate(receipt.invitation.token.expose()),
        )
        .expect_err("expired");

    assert_eq!(error.code(), ErrorCode::InvalidOrExpiredToken);
    assert_eq!(
        context.login("ada@example.com").expect_err("pending").code(),
        ErrorCode::Unauthorized
    );
}

#[rstest]
fn reissued_invitation_supersedes_the_previous_token(context: Option<TestContext>) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: reissued_invitation_supersedes_the_previous_token skipped");
        return;
    };
    let runtime = &context.harness.runtime;
    let receipt = runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("register");
    context.clock.advance(TimeDelta::hours(30));

    let reissued = runtime
        .block_on(context.onboarding.reissue_invitation("ada@example.com"))
        .expect("reissue");
    let stale = runtime
        .block_on(
            context
                .onboarding
                .activate(receipt.invitation.token.expose()),
        )
        .expect_err("superseded token");
    let activated = runtime
        .block_on(context.onboarding.activate(reissued.token.expose()))
        .expect("fresh token");

    assert_eq!(stale.code(), ErrorCode::InvalidOrExpiredToken);
    assert_eq!(&activated, receipt.user.id());
    assert_eq!(context.count("invitations"), 0);

    let active = runtime
        .block_on(context.onboarding.reissue_invitation("ada@example.com"))
        .expect_err("already active");
    assert_eq!(active.code(), ErrorCode::NotFound);
}

#[rstest]
fn concurrent_activation_succeeds_exactly_once(context: Option<TestContext>) {
    let Some(context) = context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_activation_succeeds_exactly_once skipped");
        return;
    };
    let runtime = &context.harness.runtime;
    let receipt = runtime
        .block_on(context.onboarding.register(&registration("ada")))
        .expect("register");
    let token = receipt.invitation.token.expose();

    let (first, second) = runtime.block_on(async {
        tokio::join!(
            context.onboarding.activate(token),
            context.onboarding.activate(token)
        )
    });

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(error) if error.code() == ErrorCode::InvalidOrExpiredToken
    )));
}
