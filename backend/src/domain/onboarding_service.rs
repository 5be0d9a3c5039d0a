//! Onboarding transaction coordinator.
//!
//! Registration validates the request, hashes the password, mints a random
//! invitation token and hands everything to the account repository as one
//! atomic unit. Only the token digest is persisted; the plaintext is
//! returned to the caller and offered to the mailer after commit. Mail
//! failures are logged and never undo a registration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, InvitationMailer, IssuedInvitation, NewAccount,
    PasswordHasher, PasswordHasherError, RegistrationReceipt, UserOnboarding,
};
use crate::domain::{
    ConflictKind, DEFAULT_INVITATION_TTL_HOURS, Email, Error, InvitationGrant, InvitationToken,
    RegistrationRequest, RequestValidator, UserId, WeightSample,
};

/// Onboarding service implementing [`UserOnboarding`].
#[derive(Clone)]
pub struct OnboardingService<A, H, M> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    validator: Arc<RequestValidator>,
    clock: Arc<dyn Clock>,
    invitation_ttl: TimeDelta,
}

impl<A, H, M> OnboardingService<A, H, M> {
    /// Create a service with the default invitation validity window.
    pub fn new(
        accounts: Arc<A>,
        hasher: Arc<H>,
        mailer: Arc<M>,
        validator: Arc<RequestValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            mailer,
            validator,
            clock,
            invitation_ttl: TimeDelta::hours(DEFAULT_INVITATION_TTL_HOURS),
        }
    }

    /// Override how long newly issued invitations stay valid.
    #[must_use]
    pub fn with_invitation_ttl(mut self, ttl: TimeDelta) -> Self {
        self.invitation_ttl = ttl;
        self
    }
}

impl<A, H, M> OnboardingService<A, H, M>
where
    A: AccountRepository,
    H: PasswordHasher,
    M: InvitationMailer,
{
    fn map_account_error(error: AccountRepositoryError) -> Error {
        match error {
            AccountRepositoryError::Connection { message } => {
                Error::storage_unavailable(format!("account store unavailable: {message}"))
            }
            AccountRepositoryError::Query { message } => {
                Error::internal(format!("account store error: {message}"))
            }
            AccountRepositoryError::DuplicateEmail => Error::conflict(
                ConflictKind::DuplicateEmail,
                "an account with this email already exists",
            ),
            AccountRepositoryError::DuplicateUsername => Error::conflict(
                ConflictKind::DuplicateUsername,
                "an account with this username already exists",
            ),
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn issue(&self) -> (InvitationToken, InvitationGrant) {
        let token = InvitationToken::generate();
        let grant = InvitationGrant::issue(&token, self.clock.utc(), self.invitation_ttl);
        (token, grant)
    }

    async fn dispatch(&self, email: &Email, token: &InvitationToken) {
        if let Err(error) = self.mailer.send_invitation(email, token).await {
            warn!(%error, "invitation delivery failed; account remains pending");
        }
    }
}

#[async_trait]
impl<A, H, M> UserOnboarding for OnboardingService<A, H, M>
where
    A: AccountRepository,
    H: PasswordHasher,
    M: InvitationMailer,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationReceipt, Error> {
        let registration = self.validator.registration(request)?;
        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(Self::map_hasher_error)?;
        let now = self.clock.utc();
        let account = NewAccount {
            id: UserId::random(),
            email: registration.email,
            username: registration.username,
            password_hash,
            attributes: registration.attributes,
            initial_weight: WeightSample::new(now.date_naive(), registration.initial_weight),
            created_at: now,
        };
        let (token, grant) = self.issue();

        let user = self
            .accounts
            .create_pending_account(&account, &grant)
            .await
            .map_err(Self::map_account_error)?;
        info!(user_id = %user.id(), "registered pending account");

        self.dispatch(user.email(), &token).await;
        let invitation = IssuedInvitation {
            user_id: user.id().clone(),
            token,
            expires_at: grant.expires_at(),
        };
        Ok(RegistrationReceipt { user, invitation })
    }

    async fn activate(&self, token: &str) -> Result<UserId, Error> {
        let Some(token) = InvitationToken::from_presented(token) else {
            return Err(Error::invalid_or_expired_token());
        };
        let activated = self
            .accounts
            .activate(&token.digest(), self.clock.utc())
            .await
            .map_err(Self::map_account_error)?;
        match activated {
            Some(user_id) => {
                info!(%user_id, "activated account");
                Ok(user_id)
            }
            None => {
                debug!("activation rejected: no live invitation for token");
                Err(Error::invalid_or_expired_token())
            }
        }
    }

    async fn reissue_invitation(&self, email: &str) -> Result<IssuedInvitation, Error> {
        let email = self.validator.email(email)?;
        let (token, grant) = self.issue();
        let user_id = self
            .accounts
            .reissue_invitation(&email, &grant)
            .await
            .map_err(Self::map_account_error)?
            .ok_or_else(|| Error::not_found("no pending account for this email"))?;
        info!(%user_id, "reissued invitation");

        self.dispatch(&email, &token).await;
        Ok(IssuedInvitation {
            user_id,
            token,
            expires_at: grant.expires_at(),
        })
    }
}
