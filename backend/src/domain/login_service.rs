//! Credential check backed by the account store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, LoginService, PasswordHasher,
};
use crate::domain::{Error, LoginCredentials, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] that verifies stored password hashes.
///
/// Unknown emails, wrong passwords and accounts still waiting for
/// activation are all `unauthorized`.
#[derive(Clone)]
pub struct CredentialLoginService<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
}

impl<A, H> CredentialLoginService<A, H> {
    /// Create a login service over the given account store and hasher.
    pub fn new(accounts: Arc<A>, hasher: Arc<H>) -> Self {
        Self { accounts, hasher }
    }
}

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::storage_unavailable(format!("account store unavailable: {message}"))
        }
        other => Error::internal(format!("account store error: {other}")),
    }
}

#[async_trait]
impl<A, H> LoginService for CredentialLoginService<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self
            .accounts
            .find_credentials(credentials.email())
            .await
            .map_err(map_account_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(|err| Error::internal(err.to_string()))?;
        if !verified {
            debug!(user_id = %stored.user_id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !stored.status.is_active() {
            debug!(user_id = %stored.user_id, "login rejected: account pending");
            return Err(Error::unauthorized("account has not been activated"));
        }
        Ok(stored.user_id)
    }
}
