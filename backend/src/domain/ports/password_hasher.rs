//! Driven port for the credential hashing primitive.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Turns plaintext passwords into opaque comparable hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a new password.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a presented password against a stored hash.
    fn verify(&self, password: &Password, hash: &PasswordHash)
    -> Result<bool, PasswordHasherError>;
}
