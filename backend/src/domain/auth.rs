//! Authentication primitives: plaintext passwords, opaque password hashes
//! and login credentials.
//!
//! Plaintext passwords only ever live in [`Zeroizing`] buffers and never
//! implement `Display`, so they cannot leak through formatting or logs.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum password length accepted by default policies.
pub const PASSWORD_MIN: usize = 8;

/// Maximum password length; bounds hashing cost.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when credential inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email failed identity validation.
    Email(UserValidationError),
    /// Password was shorter than the policy minimum.
    PasswordTooShort { min: usize },
    /// Password was longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Plaintext password held in memory only as long as needed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a password of at least `min_length` characters.
    pub fn with_min_length(
        password: &str,
        min_length: usize,
    ) -> Result<Self, CredentialsValidationError> {
        let length = password.chars().count();
        if length < min_length {
            return Err(CredentialsValidationError::PasswordTooShort { min: min_length });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialsValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Accept any non-empty password, for verifying an existing credential.
    pub fn for_login(password: &str) -> Result<Self, CredentialsValidationError> {
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Expose the plaintext to a hashing primitive.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Opaque, comparable password hash produced by a hashing primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hashing adapter or read from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised.
/// - `password` is non-empty but otherwise unchecked so existing accounts
///   can still sign in after a policy change.
///
/// # Examples
/// ```
/// use atomfit::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        let password = Password::for_login(password)?;
        Ok(Self { email, password })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}
