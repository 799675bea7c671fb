//! Postgres conversation store
//!
//! Messages live in their own table keyed by `(conversation_id, sequence)`.
//! Appends lock the conversation row, so sequence numbers computed inside the
//! transaction cannot collide.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use converse_common::{ObjectId, RepositoryError};

use crate::domain::entities::{Conversation, ConversationSummary, Message, MessageRole};
use crate::repository::ConversationStore;

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: String,
    user_id: String,
    chat_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: String,
    chat_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    role: String,
    content: String,
    timestamp: DateTime<Utc>,
}

fn parse_id(raw: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse(raw).map_err(|_| RepositoryError::InvalidData(format!("bad id '{}'", raw)))
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = MessageRole::parse(&row.role)
            .ok_or_else(|| RepositoryError::InvalidData(format!("bad role '{}'", row.role)))?;
        Ok(Message {
            role,
            content: row.content,
            timestamp: row.timestamp,
        })
    }
}

impl TryFrom<SummaryRow> for ConversationSummary {
    type Error = RepositoryError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(ConversationSummary {
            id: parse_id(&row.id)?,
            chat_name: row.chat_name,
        })
    }
}

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_messages(
        tx: &mut Transaction<'static, Postgres>,
        conversation_id: &str,
        first_sequence: i32,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        for (offset, message) in messages.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO messages (conversation_id, sequence, role, content, timestamp)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(conversation_id)
            .bind(first_sequence + offset as i32)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(message.timestamp)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConversationStore for PgConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let id = conversation.id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, chat_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&id)
        .bind(conversation.user_id.to_string())
        .bind(&conversation.chat_name)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_insert)?;

        Self::insert_messages(&mut tx, &id, 0, &conversation.messages).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_owned(
        &self,
        id: ObjectId,
        user_id: ObjectId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, chat_name, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT role, content, timestamp
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Message::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Conversation {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            chat_name: row.chat_name,
            messages,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    async fn list_by_user(
        &self,
        user_id: ObjectId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, chat_name
            FROM conversations
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ConversationSummary::try_from)
        .collect()
    }

    async fn append_messages(
        &self,
        id: ObjectId,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await?;

        let locked: Option<(String,)> =
            sqlx::query_as("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
                .bind(&id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let (next,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(sequence) + 1, 0) FROM messages WHERE conversation_id = $1",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_messages(&mut tx, &id, next, messages).await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
