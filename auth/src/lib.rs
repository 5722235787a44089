//! Authentication primitives library
//!
//! Provides the building blocks of token-based authentication:
//! - Password hashing (Argon2id) behind the `CredentialHasher` trait
//! - Signed, time-bounded JWTs carrying a subject and a token type
//! - The `TokenProvider` trait and its HS256 implementation, `TokenCodec`
//!
//! Services orchestrate login, refresh, and session invalidation on top of
//! these; nothing here touches storage.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access and Refresh Tokens
//! ```
//! use auth::{TokenCodec, TokenLifetimes, TokenProvider, TokenType};
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     TokenLifetimes::from_millis(30 * 60 * 1000, 14 * 24 * 60 * 60 * 1000),
//! );
//!
//! let refresh = codec.issue_refresh("alice").unwrap();
//! let verified = codec.validate(&refresh).unwrap();
//! assert_eq!(verified.subject, "alice");
//! assert_eq!(verified.token_type, TokenType::Refresh);
//! ```

pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenType;
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenCodec;
pub use tokens::TokenLifetimes;
pub use tokens::TokenProvider;
pub use tokens::VerifiedToken;
