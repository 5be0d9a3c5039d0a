//! Domain-level error types.
//!
//! These errors are transport agnostic. Driving adapters (the admin CLI
//! today) map them to exit codes, log lines, or any other envelope.
//! Storage-specific failures never reach this layer unclassified: services
//! translate port errors into one of the [`ErrorCode`] categories below.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input shape or range was rejected before touching storage.
    ValidationFailed,
    /// Credentials were missing, wrong, or belong to a pending account.
    Unauthorized,
    /// The requested record does not exist.
    NotFound,
    /// A uniqueness rule rejected the write.
    Conflict,
    /// Activation token was never issued, already consumed, or expired.
    InvalidOrExpiredToken,
    /// The store could not be reached or the round-trip deadline passed.
    StorageUnavailable,
    /// An unexpected failure occurred inside the domain or the store.
    InternalError,
}

/// Uniqueness rule behind an [`ErrorCode::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Another account already uses the email address.
    DuplicateEmail,
    /// Another account already uses the username.
    DuplicateUsername,
    /// The user already likes the target.
    DuplicateLike,
}

impl ConflictKind {
    /// Snake-case identifier used in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateEmail => "duplicate_email",
            Self::DuplicateUsername => "duplicate_username",
            Self::DuplicateLike => "duplicate_like",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `conflict` is only set when `code` is [`ErrorCode::Conflict`].
///
/// # Examples
/// ```
/// use atomfit::domain::{ConflictKind, Error, ErrorCode};
///
/// let err = Error::conflict(ConflictKind::DuplicateEmail, "email already registered");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.conflict_kind(), Some(ConflictKind::DuplicateEmail));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    conflict: Option<ConflictKind>,
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
    ConflictKindWithoutConflictCode,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
            Self::ConflictKindWithoutConflictCode => {
                write!(f, "conflict kind requires the conflict error code")
            }
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// Only call this with literal or already-validated messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            conflict: None,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Uniqueness rule that triggered a conflict, when there is one.
    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        self.conflict
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use atomfit::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation_failed("bad").with_details(json!({ "field": "email" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Validation failure pinned to a request field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation_failed(message).with_details(json!({ "field": field }))
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Conflict tagged with the uniqueness rule that rejected the write.
    pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::Conflict, message);
        error.conflict = Some(kind);
        error.with_details(json!({ "code": kind.as_str() }))
    }

    /// Convenience constructor for [`ErrorCode::InvalidOrExpiredToken`].
    pub fn invalid_or_expired_token() -> Self {
        Self::new(
            ErrorCode::InvalidOrExpiredToken,
            "invitation token is invalid or has expired",
        )
    }

    /// Convenience constructor for [`ErrorCode::StorageUnavailable`].
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conflict: Option<ConflictKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            conflict: value.conflict,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            conflict,
            details,
        } = value;

        if conflict.is_some() && code != ErrorCode::Conflict {
            return Err(ErrorValidationError::ConflictKindWithoutConflictCode);
        }
        let mut error = Error::try_new(code, message)?;
        error.conflict = conflict;
        error.details = details;
        Ok(error)
    }
}
