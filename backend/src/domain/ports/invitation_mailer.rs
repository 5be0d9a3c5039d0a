//! Driven port for out-of-band invitation delivery.
//!
//! Delivery is best-effort and happens after the registration transaction
//! commits; callers log failures instead of propagating them.

use async_trait::async_trait;

use crate::domain::{Email, InvitationToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by invitation mailers.
    pub enum InvitationMailerError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "invitation delivery failed: {message}",
    }
}

/// Hands a plaintext invitation token to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationMailer: Send + Sync {
    /// Send `token` to `email`.
    async fn send_invitation(
        &self,
        email: &Email,
        token: &InvitationToken,
    ) -> Result<(), InvitationMailerError>;
}

/// Mailer that accepts every message and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInvitationMailer;

#[async_trait]
impl InvitationMailer for FixtureInvitationMailer {
    async fn send_invitation(
        &self,
        _email: &Email,
        _token: &InvitationToken,
    ) -> Result<(), InvitationMailerError> {
        Ok(())
    }
}
