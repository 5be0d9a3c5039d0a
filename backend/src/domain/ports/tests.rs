//! Regression coverage for port error types and fixtures.

use super::*;
use crate::domain::{Email, InvitationToken};
use rstest::rstest;

#[rstest]
#[case(AccountRepositoryError::duplicate_email(), "an account with this email already exists")]
#[case(
    AccountRepositoryError::connection("refused"),
    "account repository connection failed: refused"
)]
#[case(AccountRepositoryError::query("boom"), "account repository query failed: boom")]
fn account_errors_render_messages(#[case] error: AccountRepositoryError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
fn unit_variant_constructors_build_the_variant() {
    assert_eq!(
        SocialRepositoryError::duplicate_like(),
        SocialRepositoryError::DuplicateLike
    );
    assert_eq!(
        WeightRepositoryError::user_not_found(),
        WeightRepositoryError::UserNotFound
    );
    assert_eq!(
        CatalogueRepositoryError::exercise_not_found(),
        CatalogueRepositoryError::ExerciseNotFound
    );
}

#[rstest]
fn hasher_errors_keep_their_message() {
    let error = PasswordHasherError::malformed_hash("missing salt");
    assert_eq!(
        error.to_string(),
        "stored password hash is malformed: missing salt"
    );
}

#[rstest]
#[tokio::test]
async fn fixture_mailer_accepts_every_invitation() {
    let email = Email::new("ada@example.com").expect("valid email");
    let token = InvitationToken::generate();

    FixtureInvitationMailer
        .send_invitation(&email, &token)
        .await
        .expect("fixture mailer never fails");
}
