//! Single-use invitation tokens.
//!
//! A token is 32 random bytes rendered as lowercase hex. The plaintext is
//! handed to the caller (and the mailer) exactly once; storage only ever
//! sees its SHA-256 digest, so a leaked invitations table cannot be used
//! to activate accounts.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random bytes in a freshly generated token.
pub const INVITATION_TOKEN_BYTES: usize = 32;

/// Default validity window for an invitation.
pub const DEFAULT_INVITATION_TTL_HOURS: i64 = 72;

/// Plaintext invitation token.
#[derive(Clone, PartialEq, Eq)]
pub struct InvitationToken(Zeroizing<String>);

impl InvitationToken {
    /// Draw a new token from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; INVITATION_TOKEN_BYTES]);
        OsRng.fill_bytes(&mut *bytes);
        Self(Zeroizing::new(hex::encode(&*bytes)))
    }

    /// Accept a token presented by a caller.
    ///
    /// Returns `None` for blank input; any other string is digested and
    /// looked up, so malformed tokens simply fail to match.
    pub fn from_presented(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Plaintext for out-of-band delivery.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// One-way digest persisted in place of the plaintext.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InvitationToken(**redacted**)")
    }
}

/// Hex-encoded SHA-256 digest of an [`InvitationToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read back from storage.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Invitation row as persisted: digest plus expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationGrant {
    digest: TokenDigest,
    expires_at: DateTime<Utc>,
}

impl InvitationGrant {
    /// Grant `token` for `ttl` starting at `issued_at`.
    pub fn issue(token: &InvitationToken, issued_at: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            digest: token.digest(),
            expires_at: issued_at + ttl,
        }
    }

    /// Digest stored for lookups.
    pub fn digest(&self) -> &TokenDigest {
        &self.digest
    }

    /// Instant after which the invitation can no longer be redeemed.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the grant has lapsed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
