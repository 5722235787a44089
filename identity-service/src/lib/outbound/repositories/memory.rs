use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::IdentifierKind;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::RefreshTokenRepository;
use crate::domain::auth::ports::UserRepository;

/// Process-local user store, keyed by subject.
///
/// Used for `storage.backend = "memory"` and by the API tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Subject, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.subject) {
            return Err(AuthError::UserAlreadyExists(user.subject.to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyExists(user.email.as_str().to_string()));
        }
        if users.values().any(|u| u.phone_number == user.phone_number) {
            return Err(AuthError::UserAlreadyExists(
                user.phone_number.as_str().to_string(),
            ));
        }

        users.insert(user.subject.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_identifier(
        &self,
        kind: IdentifierKind,
        value: &str,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;

        let found = users.values().find(|u| match kind {
            IdentifierKind::Subject => u.subject.as_str() == value,
            IdentifierKind::Email => u.email.as_str() == value,
            IdentifierKind::PhoneNumber => u.phone_number.as_str() == value,
        });

        Ok(found.cloned())
    }

    async fn find_by_phone_number_and_display_name(
        &self,
        phone_number: &PhoneNumber,
        display_name: &str,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .find(|u| &u.phone_number == phone_number && u.display_name == display_name)
            .cloned())
    }

    async fn update_password(&self, subject: &Subject, password_hash: &str) -> Result<(), AuthError> {
        let mut users = self.users.write().await;

        let user = users
            .get_mut(subject)
            .ok_or_else(|| AuthError::UserNotFound(subject.to_string()))?;
        user.password_hash = password_hash.to_string();

        Ok(())
    }

    async fn delete(&self, subject: &Subject) -> Result<(), AuthError> {
        self.users
            .write()
            .await
            .remove(subject)
            .map(|_| ())
            .ok_or_else(|| AuthError::UserNotFound(subject.to_string()))
    }
}

#[derive(Debug, Default)]
struct TokenTable {
    next_id: i64,
    records: HashMap<Subject, RefreshTokenRecord>,
}

/// Process-local refresh token store.
///
/// Every mutation happens under a single write lock, so an upsert and a
/// concurrent lookup never observe a half-written record.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenRepository {
    table: RwLock<TokenTable>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn upsert(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let mut table = self.table.write().await;

        if let Some(record) = table.records.get_mut(subject) {
            record.token_value = token_value.to_string();
            return Ok(record.clone());
        }

        table.next_id += 1;
        let record = RefreshTokenRecord {
            id: table.next_id,
            subject: subject.clone(),
            token_value: token_value.to_string(),
        };
        table.records.insert(subject.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_subject(
        &self,
        subject: &Subject,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self.table.read().await.records.get(subject).cloned())
    }

    async fn find_by_subject_and_token(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let table = self.table.read().await;

        Ok(table
            .records
            .get(subject)
            .filter(|record| record.token_value == token_value)
            .cloned())
    }

    async fn rotate(
        &self,
        subject: &Subject,
        presented: &str,
        next: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let mut table = self.table.write().await;

        let Some(record) = table
            .records
            .get_mut(subject)
            .filter(|record| record.token_value == presented)
        else {
            return Ok(None);
        };
        record.token_value = next.to_string();

        Ok(Some(record.clone()))
    }

    async fn delete_by_subject(&self, subject: &Subject) -> Result<u64, AuthError> {
        let removed = self.table.write().await.records.remove(subject);
        Ok(u64::from(removed.is_some()))
    }
}
