use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::IdentifierKind;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::NewPassword;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::ResetPasswordCommand;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user with a hashed password.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Subject, email, or phone number is taken
    /// * `StoreUnavailable` - Storage operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `identifier` - Subject, email, or phone number
    /// * `password` - Plaintext password
    ///
    /// # Errors
    /// * `UserNotFound` - No user matches the identifier
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Storage operation failed
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Exchange the active refresh token of `subject` for a new pair.
    ///
    /// The presented token is rotated out: it cannot be used again.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, wrong type, other subject, or rotated out
    /// * `Expired` - Token is past its expiry
    /// * `StoreUnavailable` - Storage operation failed
    async fn refresh(&self, subject: &Subject, presented: &str) -> Result<TokenPair, AuthError>;

    /// Invalidate every session of `subject`; used by logout.
    ///
    /// # Returns
    /// Number of refresh tokens removed (0 when none existed)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn invalidate_sessions(&self, subject: &Subject) -> Result<u64, AuthError>;

    /// Change the password of an authenticated user, then invalidate sessions.
    ///
    /// # Errors
    /// * `UserNotFound` - User no longer exists
    /// * `InvalidCredentials` - Current password does not match
    /// * `StoreUnavailable` - Storage operation failed
    async fn change_password(
        &self,
        subject: &Subject,
        current_password: &str,
        new_password: NewPassword,
    ) -> Result<(), AuthError>;

    /// Set a new password for a user proven by subject and phone number,
    /// then invalidate sessions.
    ///
    /// # Errors
    /// * `UserNotFound` - No user matches the (subject, phone number) pair
    /// * `StoreUnavailable` - Storage operation failed
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError>;

    /// Delete the account of an authenticated user after re-checking the password.
    ///
    /// # Errors
    /// * `UserNotFound` - User no longer exists
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Storage operation failed
    async fn withdraw(&self, subject: &Subject, password: &str) -> Result<(), AuthError>;

    /// Recover the subject of the user owning a phone number and display name.
    ///
    /// # Errors
    /// * `UserNotFound` - No user matches both values
    /// * `StoreUnavailable` - Storage operation failed
    async fn find_subject(
        &self,
        phone_number: &PhoneNumber,
        display_name: &str,
    ) -> Result<Subject, AuthError>;
}

/// User lookup and credential persistence.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Subject, email, or phone number is taken
    /// * `StoreUnavailable` - Storage operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Find a user by one kind of identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn find_by_identifier(
        &self,
        kind: IdentifierKind,
        value: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Find the user owning `phone_number` whose display name is `display_name`.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn find_by_phone_number_and_display_name(
        &self,
        phone_number: &PhoneNumber,
        display_name: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Replace the stored password hash.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `StoreUnavailable` - Storage operation failed
    async fn update_password(&self, subject: &Subject, password_hash: &str)
        -> Result<(), AuthError>;

    /// Remove a user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `StoreUnavailable` - Storage operation failed
    async fn delete(&self, subject: &Subject) -> Result<(), AuthError>;
}

/// Persistence of the single active refresh token per subject.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Insert the token for `subject`, or overwrite the existing one.
    ///
    /// Must be atomic: concurrent calls for one subject leave one record.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn upsert(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<RefreshTokenRecord, AuthError>;

    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn find_by_subject(
        &self,
        subject: &Subject,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Find the record only if `token_value` is the subject's active token.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn find_by_subject_and_token(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Replace the token of `subject` with `next` only if `presented` is the
    /// active one. Check and write are a single atomic step.
    ///
    /// # Returns
    /// The updated record, or None when `presented` is not active
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn rotate(
        &self,
        subject: &Subject,
        presented: &str,
        next: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Delete every record of `subject`.
    ///
    /// # Returns
    /// Number of deleted records; 0 is not an error
    ///
    /// # Errors
    /// * `StoreUnavailable` - Storage operation failed
    async fn delete_by_subject(&self, subject: &Subject) -> Result<u64, AuthError>;
}
