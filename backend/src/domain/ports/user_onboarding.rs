//! Driving port for account onboarding.
//!
//! Covers the `Pending -> Active` lifecycle: registration creates a pending
//! account with a single-use invitation, activation consumes it, and a
//! re-invite replaces an unused invitation without touching the account.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, InvitationToken, RegistrationRequest, User, UserId};

/// Plaintext invitation handed back to the caller exactly once.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    pub user_id: UserId,
    /// Only the digest of this value is stored.
    pub token: InvitationToken,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub user: User,
    pub invitation: IssuedInvitation,
}

/// Domain use-case port for onboarding.
#[async_trait]
pub trait UserOnboarding: Send + Sync {
    /// Create a pending account and its invitation atomically.
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt, Error>;

    /// Consume a presented invitation token and activate its account.
    async fn activate(&self, token: &str) -> Result<UserId, Error>;

    /// Replace the invitation of a still-pending account.
    async fn reissue_invitation(&self, email: &str) -> Result<IssuedInvitation, Error>;
}
