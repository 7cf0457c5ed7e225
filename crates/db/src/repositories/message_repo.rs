//! Repository for the `chat_messages` table.

use sqlx::PgPool;
use worklane_core::status::ChatStatus;
use worklane_core::types::DbId;

use crate::models::message::ChatMessage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, chat_id, sender_id, body, created_at";

/// Provides operations for chat messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message into an Active chat.
    ///
    /// The Active guard is part of the INSERT so a message cannot land in a
    /// chat that closes concurrently. Returns `None` if the chat is missing
    /// or already Closed.
    pub async fn insert(
        pool: &PgPool,
        chat_id: DbId,
        sender_id: DbId,
        body: &str,
    ) -> Result<Option<ChatMessage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (chat_id, sender_id, body)
             SELECT $1, $2, $3
             WHERE EXISTS (SELECT 1 FROM chats WHERE id = $1 AND status_id = $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(chat_id)
            .bind(sender_id)
            .bind(body)
            .bind(ChatStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// List a chat's messages, oldest first.
    pub async fn list_for_chat(
        pool: &PgPool,
        chat_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_messages WHERE chat_id = $1
             ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(chat_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
