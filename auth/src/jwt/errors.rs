use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Signature mismatch or structurally malformed token.
    #[error("Token signature is invalid: {0}")]
    BadSignature(String),

    #[error("Token is expired")]
    Expired,

    /// Signature verified but the payload could not be decoded.
    #[error("Token payload could not be decoded: {0}")]
    Unparseable(String),
}
