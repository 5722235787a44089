use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::PasswordPolicyError;
use crate::domain::auth::errors::PhoneNumberError;
use crate::domain::auth::errors::SubjectError;

/// Registered user, as far as authentication is concerned.
#[derive(Debug, Clone)]
pub struct User {
    pub subject: Subject,
    pub email: EmailAddress,
    pub display_name: String,
    pub phone_number: PhoneNumber,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Unique user identifier, carried as the `sub` claim of every token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    const MAX_LENGTH: usize = 64;

    /// Create a subject from a raw identifier.
    ///
    /// # Errors
    /// * `Empty` - Identifier is blank
    /// * `TooLong` - Identifier exceeds 64 characters
    pub fn new(subject: impl Into<String>) -> Result<Self, SubjectError> {
        let subject = subject.into();
        let length = subject.chars().count();

        if subject.trim().is_empty() {
            Err(SubjectError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(SubjectError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(subject))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character kept, the rest replaced by `*`, e.g. `a****`.
    pub fn masked(&self) -> String {
        let mut chars = self.0.chars();
        chars
            .next()
            .into_iter()
            .chain(chars.map(|_| '*'))
            .collect()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number type
///
/// Digits with optional '-' separators, e.g. `010-1234-5678`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone_number: String) -> Result<Self, PhoneNumberError> {
        let digits = phone_number.chars().filter(char::is_ascii_digit).count();
        let well_formed = phone_number
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-')
            && !phone_number.starts_with('-')
            && !phone_number.ends_with('-');

        if well_formed && (7..=15).contains(&digits) {
            Ok(Self(phone_number))
        } else {
            Err(PhoneNumberError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that satisfies the policy for newly chosen passwords.
///
/// Only applied when a password is set; login accepts whatever was typed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 30;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if (Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            Ok(Self(password))
        } else {
            Err(PasswordPolicyError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            })
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(***)")
    }
}

/// Kind of identifier a user may log in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Subject,
    Email,
    PhoneNumber,
}

impl IdentifierKind {
    /// Order in which a login identifier is tried; first match wins.
    pub const LOOKUP_ORDER: [IdentifierKind; 3] = [
        IdentifierKind::Subject,
        IdentifierKind::Email,
        IdentifierKind::PhoneNumber,
    ];
}

/// Persisted refresh token; at most one exists per subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub subject: Subject,
    pub token_value: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub subject: Subject,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in milliseconds
    pub expires_in_ms: i64,
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub subject: Subject,
    pub email: EmailAddress,
    pub display_name: String,
    pub phone_number: PhoneNumber,
    pub password: NewPassword,
}

/// Command to reset a forgotten password.
///
/// Identity is proven by the (subject, phone number) pair.
#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub subject: Subject,
    pub phone_number: PhoneNumber,
    pub new_password: NewPassword,
}
