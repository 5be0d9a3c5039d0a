//! Driven port for the identity store and invitation ledger.
//!
//! Registration, activation and re-invitation each touch several tables, so
//! every method here is one atomic unit: adapters must run the whole body in
//! a single transaction and roll back on any failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AccountStatus, Email, InvitationGrant, PasswordHash, ProfileAttributes, TokenDigest, User,
    UserId, Username, WeightSample,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail => "an account with this email already exists",
        /// The username is already taken.
        DuplicateUsername => "an account with this username already exists",
    }
}

/// Everything registration persists besides the invitation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub attributes: ProfileAttributes,
    /// First weight sample, dated on the creation day.
    pub initial_weight: WeightSample,
    pub created_at: DateTime<Utc>,
}

/// Stored credential used to authenticate a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
    pub status: AccountStatus,
}

/// Port for account lifecycle persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert the user, attributes, initial weight and invitation together.
    ///
    /// The returned user is pending. Nothing is persisted on error.
    async fn create_pending_account(
        &self,
        account: &NewAccount,
        invitation: &InvitationGrant,
    ) -> Result<User, AccountRepositoryError>;

    /// Consume the invitation matching `digest` if it has not expired at
    /// `now`, and activate its user.
    ///
    /// Returns `None` when no live invitation matches. Under concurrent
    /// calls with the same digest at most one returns `Some`.
    async fn activate(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AccountRepositoryError>;

    /// Replace the invitation of the pending user registered under `email`.
    ///
    /// Returns `None` when no pending user has that email.
    async fn reissue_invitation(
        &self,
        email: &Email,
        invitation: &InvitationGrant,
    ) -> Result<Option<UserId>, AccountRepositoryError>;

    /// Fetch the stored credential for `email`.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;
}
