use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::IdentifierKind;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    subject: String,
    email: String,
    display_name: String,
    phone_number: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            subject: Subject::new(row.subject)?,
            email: EmailAddress::new(row.email)?,
            display_name: row.display_name,
            phone_number: PhoneNumber::new(row.phone_number)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

fn lookup_query(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Subject => {
            r#"
            SELECT subject, email, display_name, phone_number, password_hash, created_at
            FROM users
            WHERE subject = $1
            "#
        }
        IdentifierKind::Email => {
            r#"
            SELECT subject, email, display_name, phone_number, password_hash, created_at
            FROM users
            WHERE email = $1
            "#
        }
        IdentifierKind::PhoneNumber => {
            r#"
            SELECT subject, email, display_name, phone_number, password_hash, created_at
            FROM users
            WHERE phone_number = $1
            "#
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (subject, email, display_name, phone_number, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.subject.as_str())
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(user.phone_number.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("users_email_key") => {
                            AuthError::UserAlreadyExists(user.email.as_str().to_string())
                        }
                        Some("users_phone_number_key") => {
                            AuthError::UserAlreadyExists(user.phone_number.as_str().to_string())
                        }
                        _ => AuthError::UserAlreadyExists(user.subject.to_string()),
                    };
                }
            }
            AuthError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_identifier(
        &self,
        kind: IdentifierKind,
        value: &str,
    ) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(lookup_query(kind))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose().map_err(|e| {
            tracing::error!(error = %e, "Stored user row failed validation");
            AuthError::Internal(e.to_string())
        })
    }

    async fn find_by_phone_number_and_display_name(
        &self,
        phone_number: &PhoneNumber,
        display_name: &str,
    ) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT subject, email, display_name, phone_number, password_hash, created_at
            FROM users
            WHERE phone_number = $1 AND display_name = $2
            "#,
        )
        .bind(phone_number.as_str())
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose().map_err(|e| {
            tracing::error!(error = %e, "Stored user row failed validation");
            AuthError::Internal(e.to_string())
        })
    }

    async fn update_password(&self, subject: &Subject, password_hash: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE subject = $1
            "#,
        )
        .bind(subject.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(subject.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, subject: &Subject) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE subject = $1
            "#,
        )
        .bind(subject.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(subject.to_string()));
        }

        Ok(())
    }
}
