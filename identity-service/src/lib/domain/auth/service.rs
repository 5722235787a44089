use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialHasher;
use auth::TokenProvider;
use auth::TokenType;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::IdentifierKind;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::NewPassword;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::ResetPasswordCommand;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::RefreshTokenRepository;
use crate::domain::auth::ports::UserRepository;

/// Domain service implementation for authentication operations.
///
/// Stateless apart from its collaborators; all persistence goes through the
/// repository ports.
pub struct AuthService<UR, RR, H, T>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    H: CredentialHasher,
    T: TokenProvider,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RR>,
    password_hasher: H,
    tokens: Arc<T>,
    /// Verified against when no user matches the login identifier.
    decoy_hash: Option<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

impl<UR, RR, H, T> AuthService<UR, RR, H, T>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    H: CredentialHasher,
    T: TokenProvider,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User lookup and credential persistence
    /// * `refresh_tokens` - Refresh token store
    /// * `password_hasher` - Credential hasher
    /// * `tokens` - Token issuer and verifier
    pub fn new(users: Arc<UR>, refresh_tokens: Arc<RR>, password_hasher: H, tokens: Arc<T>) -> Self {
        let decoy_hash = password_hasher
            .hash(DECOY_PASSWORD)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to prepare decoy password hash"))
            .ok();

        Self {
            users,
            refresh_tokens,
            password_hasher,
            tokens,
            decoy_hash,
        }
    }

    async fn find_user(&self, identifier: &str) -> Result<Option<User>, AuthError> {
        for kind in IdentifierKind::LOOKUP_ORDER {
            if let Some(user) = self.users.find_by_identifier(kind, identifier).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    async fn get_user(&self, subject: &Subject) -> Result<User, AuthError> {
        self.users
            .find_by_identifier(IdentifierKind::Subject, subject.as_str())
            .await?
            .ok_or_else(|| AuthError::UserNotFound(subject.to_string()))
    }

    fn verify_password(&self, user: &User, password: &str) -> Result<(), AuthError> {
        if self.password_hasher.verify(password, &user.password_hash) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn set_password(&self, subject: &Subject, password: &NewPassword) -> Result<(), AuthError> {
        let password_hash = self.password_hasher.hash(password.expose())?;
        self.users.update_password(subject, &password_hash).await
    }
}

#[async_trait]
impl<UR, RR, H, T> AuthServicePort for AuthService<UR, RR, H, T>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    H: CredentialHasher,
    T: TokenProvider,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let password_hash = self.password_hasher.hash(command.password.expose())?;

        let user = User {
            subject: command.subject,
            email: command.email,
            display_name: command.display_name,
            phone_number: command.phone_number,
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.users.create(user).await?;
        tracing::info!(subject = %created.subject, "User registered");

        Ok(created)
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.find_user(identifier).await? else {
            if let Some(decoy_hash) = &self.decoy_hash {
                self.password_hasher.verify(password, decoy_hash);
            }
            tracing::warn!("Login failed: no user matches the identifier");
            return Err(AuthError::UserNotFound(identifier.to_string()));
        };

        self.verify_password(&user, password).inspect_err(|_| {
            tracing::warn!(subject = %user.subject, "Login failed: password mismatch");
        })?;

        let access_token = self.tokens.issue_access(user.subject.as_str())?;
        let refresh_token = self.tokens.issue_refresh(user.subject.as_str())?;

        self.refresh_tokens
            .upsert(&user.subject, &refresh_token)
            .await?;

        tracing::info!(subject = %user.subject, "Login succeeded, tokens issued");

        Ok(LoginOutcome {
            subject: user.subject,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, subject: &Subject, presented: &str) -> Result<TokenPair, AuthError> {
        let verified = self.tokens.validate(presented)?;

        if verified.token_type != TokenType::Refresh {
            tracing::warn!(
                subject = %subject,
                token_type = %verified.token_type,
                "Refresh rejected: token is not a refresh token"
            );
            return Err(AuthError::InvalidToken);
        }

        if verified.subject != subject.as_str() {
            tracing::warn!(subject = %subject, "Refresh rejected: token belongs to another subject");
            return Err(AuthError::InvalidToken);
        }

        self.refresh_tokens
            .find_by_subject_and_token(subject, presented)
            .await?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Refresh rejected: token is not the active one");
                AuthError::InvalidToken
            })?;

        let access_token = self.tokens.issue_access(subject.as_str())?;
        let refresh_token = self.tokens.issue_refresh(subject.as_str())?;

        // Only one caller can swap out the presented token
        self.refresh_tokens
            .rotate(subject, presented, &refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Refresh rejected: token was rotated concurrently");
                AuthError::InvalidToken
            })?;

        tracing::info!(subject = %subject, "Refresh token rotated");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in_ms: self.tokens.access_ttl().num_milliseconds(),
        })
    }

    async fn invalidate_sessions(&self, subject: &Subject) -> Result<u64, AuthError> {
        let deleted = self.refresh_tokens.delete_by_subject(subject).await?;

        if deleted > 0 {
            tracing::info!(subject = %subject, deleted, "Sessions invalidated");
        } else {
            tracing::debug!(subject = %subject, "No sessions to invalidate");
        }

        Ok(deleted)
    }

    async fn change_password(
        &self,
        subject: &Subject,
        current_password: &str,
        new_password: NewPassword,
    ) -> Result<(), AuthError> {
        let user = self.get_user(subject).await?;
        self.verify_password(&user, current_password)?;

        self.set_password(subject, &new_password).await?;
        self.invalidate_sessions(subject).await?;

        tracing::info!(subject = %subject, "Password changed");
        Ok(())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
        let user = self.get_user(&command.subject).await?;

        if user.phone_number != command.phone_number {
            tracing::warn!(subject = %command.subject, "Password reset rejected: phone number mismatch");
            return Err(AuthError::UserNotFound(command.subject.to_string()));
        }

        self.set_password(&command.subject, &command.new_password)
            .await?;
        self.invalidate_sessions(&command.subject).await?;

        tracing::info!(subject = %command.subject, "Password reset");
        Ok(())
    }

    async fn withdraw(&self, subject: &Subject, password: &str) -> Result<(), AuthError> {
        let user = self.get_user(subject).await?;
        self.verify_password(&user, password)?;

        self.users.delete(subject).await?;
        self.invalidate_sessions(subject).await?;

        tracing::info!(subject = %subject, "Account withdrawn");
        Ok(())
    }

    async fn find_subject(
        &self,
        phone_number: &PhoneNumber,
        display_name: &str,
    ) -> Result<Subject, AuthError> {
        self.users
            .find_by_phone_number_and_display_name(phone_number, display_name)
            .await?
            .map(|user| user.subject)
            .ok_or_else(|| {
                tracing::warn!("Subject lookup failed: no user matches phone number and name");
                AuthError::UserNotFound(phone_number.as_str().to_string())
            })
    }
}
