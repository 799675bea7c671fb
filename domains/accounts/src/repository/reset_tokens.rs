//! Postgres reset token store
//!
//! `reset_tokens.email` is unique, so a second live token for one email loses
//! at the constraint even when two requests race past the service check.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use converse_common::RepositoryError;

use crate::domain::entities::ResetToken;
use crate::repository::ResetTokenStore;

#[derive(Debug, sqlx::FromRow)]
struct ResetTokenRow {
    token_hash: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<ResetTokenRow> for ResetToken {
    fn from(row: ResetTokenRow) -> Self {
        ResetToken {
            token_hash: row.token_hash,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgResetTokenStore {
    pool: PgPool,
}

impl PgResetTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ResetTokenStore for PgResetTokenStore {
    async fn create(
        &self,
        token: &ResetToken,
        live_after: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // An expired row the sweeper has not reached yet must not block a new request
        sqlx::query("DELETE FROM reset_tokens WHERE email = $1 AND created_at <= $2")
            .bind(&token.email)
            .bind(live_after)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO reset_tokens (token_hash, email, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&token.token_hash)
        .bind(&token.email)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_insert)?;

        tx.commit().await?;
        Ok(())
    }

    async fn take_live(
        &self,
        token_hash: &str,
        live_after: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, RepositoryError> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            r#"
            DELETE FROM reset_tokens
            WHERE token_hash = $1 AND created_at > $2
            RETURNING token_hash, email, created_at
            "#,
        )
        .bind(token_hash)
        .bind(live_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_expired(&self, live_after: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM reset_tokens WHERE created_at <= $1")
            .bind(live_after)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
