use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Intended use of a token, carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential presented on every request
    Access,
    /// Long-lived credential exchanged for a new token pair
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims issued by this crate.
///
/// Every field is mandatory: a token missing any of them cannot be decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type (access or refresh)
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// JWT ID, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject, valid for `ttl` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - User identifier placed in `sub`
    /// * `token_type` - Access or refresh
    /// * `issued_at` - Issue instant
    /// * `ttl` - Lifetime added to `issued_at` to compute `exp`
    ///
    /// # Returns
    /// Claims with a fresh random `jti`
    pub fn new(
        subject: impl ToString,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            token_type,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Create claims issued now.
    pub fn issue_now(subject: impl ToString, token_type: TokenType, ttl: Duration) -> Self {
        Self::new(subject, token_type, Utc::now(), ttl)
    }

    /// Check if token is expired.
    ///
    /// A token is expired once `exp` is reached, so `exp == now` counts as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
