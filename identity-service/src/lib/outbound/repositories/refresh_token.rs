use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::Subject;
use crate::domain::auth::ports::RefreshTokenRepository;

/// Refresh token store backed by the `refresh_tokens` table.
///
/// The unique constraint on `subject` keeps at most one token per user.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: i64,
    subject: String,
    token_value: String,
}

impl TryFrom<RefreshTokenRow> for RefreshTokenRecord {
    type Error = AuthError;

    fn try_from(row: RefreshTokenRow) -> Result<Self, Self::Error> {
        Ok(RefreshTokenRecord {
            id: row.id,
            subject: Subject::new(row.subject)?,
            token_value: row.token_value,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn upsert(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let row: RefreshTokenRow = sqlx::query_as(
            r#"
            INSERT INTO refresh_tokens (subject, token_value)
            VALUES ($1, $2)
            ON CONFLICT (subject)
            DO UPDATE SET token_value = EXCLUDED.token_value, updated_at = now()
            RETURNING id, subject, token_value
            "#,
        )
        .bind(subject.as_str())
        .bind(token_value)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_subject(
        &self,
        subject: &Subject,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            r#"
            SELECT id, subject, token_value
            FROM refresh_tokens
            WHERE subject = $1
            "#,
        )
        .bind(subject.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RefreshTokenRecord::try_from).transpose()
    }

    async fn find_by_subject_and_token(
        &self,
        subject: &Subject,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            r#"
            SELECT id, subject, token_value
            FROM refresh_tokens
            WHERE subject = $1 AND token_value = $2
            "#,
        )
        .bind(subject.as_str())
        .bind(token_value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RefreshTokenRecord::try_from).transpose()
    }

    async fn rotate(
        &self,
        subject: &Subject,
        presented: &str,
        next: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            r#"
            UPDATE refresh_tokens
            SET token_value = $3, updated_at = now()
            WHERE subject = $1 AND token_value = $2
            RETURNING id, subject, token_value
            "#,
        )
        .bind(subject.as_str())
        .bind(presented)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RefreshTokenRecord::try_from).transpose()
    }

    async fn delete_by_subject(&self, subject: &Subject) -> Result<u64, AuthError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE subject = $1
            "#,
        )
        .bind(subject.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
