//! Log-backed `InvitationMailer`.
//!
//! Delivery is a structured `tracing` event carrying the activation link.
//! It stands in for an SMTP or provider adapter in development and in the
//! admin CLI, where the operator reads the link from the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{InvitationMailer, InvitationMailerError};
use crate::domain::{Email, InvitationToken};

/// Mailer that writes each invitation to the log.
#[derive(Debug, Clone)]
pub struct LoggingInvitationMailer {
    activation_base_url: String,
}

impl LoggingInvitationMailer {
    /// Create a mailer that links to `activation_base_url`.
    pub fn new(activation_base_url: impl Into<String>) -> Self {
        Self {
            activation_base_url: activation_base_url.into(),
        }
    }

    /// Link a user follows to redeem `token`.
    pub fn activation_link(&self, token: &InvitationToken) -> String {
        let base = self.activation_base_url.trim_end_matches('/');
        format!("{base}/{}", token.expose())
    }
}

#[async_trait]
impl InvitationMailer for LoggingInvitationMailer {
    async fn send_invitation(
        &self,
        email: &Email,
        token: &InvitationToken,
    ) -> Result<(), InvitationMailerError> {
        if self.activation_base_url.trim().is_empty() {
            return Err(InvitationMailerError::delivery(
                "activation base URL is not configured",
            ));
        }
        info!(
            recipient = %email,
            activation_link = %self.activation_link(token),
            "invitation issued"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn email() -> Email {
        Email::new("ada@example.com").expect("valid email")
    }

    #[rstest]
    #[case("https://atomfit.example/activate")]
    #[case("https://atomfit.example/activate/")]
    fn link_appends_the_token_once(#[case] base: &str) {
        let mailer = LoggingInvitationMailer::new(base);
        let token = InvitationToken::generate();

        assert_eq!(
            mailer.activation_link(&token),
            format!("https://atomfit.example/activate/{}", token.expose())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn configured_mailer_delivers() {
        let mailer = LoggingInvitationMailer::new("https://atomfit.example/activate");

        mailer
            .send_invitation(&email(), &InvitationToken::generate())
            .await
            .expect("delivered");
    }

    #[rstest]
    #[tokio::test]
    async fn blank_base_url_fails_delivery() {
        let mailer = LoggingInvitationMailer::new("  ");

        let error = mailer
            .send_invitation(&email(), &InvitationToken::generate())
            .await
            .expect_err("unconfigured");

        assert!(matches!(error, InvitationMailerError::Delivery { .. }));
    }
}
