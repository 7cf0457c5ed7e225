//! Chat message entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use worklane_core::types::{DbId, Timestamp};

/// A message row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub chat_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /chats/{id}/messages`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessage {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}
