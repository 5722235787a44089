use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenType;

/// Lifetimes applied when issuing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    /// Build lifetimes from millisecond values, as found in configuration.
    pub fn from_millis(access_ms: i64, refresh_ms: i64) -> Self {
        Self {
            access: Duration::milliseconds(access_ms),
            refresh: Duration::milliseconds(refresh_ms),
        }
    }

    /// Lifetime for the given token type.
    pub fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access,
            TokenType::Refresh => self.refresh,
        }
    }
}

/// Claims that survived signature and expiry verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub token_type: TokenType,
}

/// Issues and verifies signed, time-bounded tokens.
///
/// Verification does not enforce the token type; callers compare
/// `VerifiedToken::token_type` with the use they expect.
pub trait TokenProvider: Send + Sync + 'static {
    /// Issue a token of `token_type` for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token could not be signed
    fn issue(&self, subject: &str, token_type: TokenType) -> Result<String, JwtError>;

    /// Verify signature, then expiry, and return subject and type.
    ///
    /// # Errors
    /// * `BadSignature` - Tampered, unsigned, or malformed token
    /// * `Unparseable` - Payload could not be decoded
    /// * `Expired` - `exp` is not in the future
    fn validate(&self, token: &str) -> Result<VerifiedToken, JwtError>;

    /// Lifetime of freshly issued access tokens.
    fn access_ttl(&self) -> Duration;

    fn issue_access(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, TokenType::Access)
    }

    fn issue_refresh(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, TokenType::Refresh)
    }
}

/// HS256 JWT implementation of [`TokenProvider`].
///
/// Holds the signing key and lifetimes; immutable after construction and safe
/// to share between request handlers.
pub struct TokenCodec {
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl TokenCodec {
    /// Create a new codec.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key
    /// * `lifetimes` - Access and refresh token lifetimes
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            lifetimes,
        }
    }

    /// Sign arbitrary claims with the codec's key.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }
}

impl TokenProvider for TokenCodec {
    fn issue(&self, subject: &str, token_type: TokenType) -> Result<String, JwtError> {
        let claims = Claims::issue_now(subject, token_type, self.lifetimes.ttl(token_type));
        self.encode_claims(&claims)
    }

    fn validate(&self, token: &str) -> Result<VerifiedToken, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(VerifiedToken {
            subject: claims.sub,
            token_type: claims.token_type,
        })
    }

    fn access_ttl(&self) -> Duration {
        self.lifetimes.access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, TokenLifetimes::from_millis(30 * 60 * 1000, 14 * 24 * 60 * 60 * 1000))
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let codec = codec();

        for token_type in [TokenType::Access, TokenType::Refresh] {
            let token = codec.issue("alice", token_type).expect("Failed to issue token");
            let verified = codec.validate(&token).expect("Token validation failed");

            assert_eq!(
                verified,
                VerifiedToken {
                    subject: "alice".to_string(),
                    token_type,
                }
            );
        }
    }

    #[test]
    fn test_lifetime_depends_on_type() {
        let codec = codec();
        let handler = JwtHandler::new(SECRET);

        let access: Claims = handler.decode(&codec.issue_access("alice").unwrap()).unwrap();
        let refresh: Claims = handler.decode(&codec.issue_refresh("alice").unwrap()).unwrap();

        assert_eq!(access.exp - access.iat, 30 * 60);
        assert_eq!(refresh.exp - refresh.iat, 14 * 24 * 60 * 60);
        assert_eq!(codec.access_ttl(), Duration::minutes(30));
    }

    #[test]
    fn test_backdated_token_is_expired() {
        let codec = codec();

        let mut claims = Claims::issue_now("alice", TokenType::Access, Duration::minutes(30));
        claims.iat = Utc::now().timestamp() - 60;
        claims.exp = Utc::now().timestamp() - 1;
        let token = codec.encode_claims(&claims).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_flipped_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue_access("alice").unwrap();

        // Flip the first character of the signature segment
        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[signature_start] = if bytes[signature_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            codec.validate(&tampered),
            Err(JwtError::BadSignature(_))
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected_before_expiry_check() {
        let codec = codec();
        let other = TokenCodec::new(
            b"another_secret_key_at_least_32_bytes",
            codec.lifetimes(),
        );

        // Expired and signed with a foreign key: the signature failure wins
        let mut claims = Claims::issue_now("mallory", TokenType::Access, Duration::minutes(1));
        claims.exp = 0;
        let token = other.encode_claims(&claims).unwrap();

        assert!(matches!(
            codec.validate(&token),
            Err(JwtError::BadSignature(_))
        ));
    }

    #[test]
    fn test_signed_token_without_type_is_unparseable() {
        let codec = codec();
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .encode(&serde_json::json!({
                "sub": "alice",
                "iat": Utc::now().timestamp(),
                "exp": Utc::now().timestamp() + 600,
            }))
            .unwrap();

        assert!(matches!(
            codec.validate(&token),
            Err(JwtError::Unparseable(_))
        ));
    }

    #[test]
    fn test_validate_garbage() {
        let codec = codec();

        assert!(matches!(
            codec.validate("invalid.token.here"),
            Err(JwtError::BadSignature(_))
        ));
        assert!(matches!(codec.validate(""), Err(JwtError::BadSignature(_))));
    }
}
