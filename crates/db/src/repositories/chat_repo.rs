//! Repository for the `chats` table.
//!
//! `set_close_flag` is the single synchronization point between the chat
//! and project aggregates: the flag set, the conditional close, and the
//! project completion all land atomically.

use sqlx::PgPool;
use worklane_core::lifecycle::{CloseFlags, CloseRole};
use worklane_core::status::{ChatStatus, ProjectStatus};
use worklane_core::types::DbId;

use crate::models::chat::Chat;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, client_id, freelancer_id, client_close_flag, \
                        freelancer_close_flag, status_id, created_at, updated_at";

/// Outcome of a close-flag update.
#[derive(Debug, Clone)]
pub struct CloseFlagOutcome {
    /// The chat row after the update.
    pub chat: Chat,
    /// True when this call transitioned the chat to Closed (and marked the
    /// project Completed). False for the first flag and for repeats.
    pub newly_closed: bool,
}

/// Provides operations for chat rooms.
pub struct ChatRepo;

impl ChatRepo {
    /// Find a chat by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chat>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chats WHERE id = $1");
        sqlx::query_as::<_, Chat>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set one party's ready-to-close flag and, if both flags are now set,
    /// close the chat and mark the linked project Completed.
    ///
    /// The flag set and the close decision are a single UPDATE: both flag
    /// columns are OR-combined with the caller's role and the new status is
    /// computed from the post-update values inside the same statement.
    /// Postgres row locking serializes concurrent calls, so two
    /// near-simultaneous requests (one per party) both persist and exactly
    /// one of them observes the Active -> Closed transition. The project
    /// completion runs in the same transaction, guarded on the status so a
    /// repeated call cannot re-fire it.
    ///
    /// Setting an already-true flag is a no-op. Returns `None` if the chat
    /// does not exist.
    pub async fn set_close_flag(
        pool: &PgPool,
        chat_id: DbId,
        role: CloseRole,
    ) -> Result<Option<CloseFlagOutcome>, sqlx::Error> {
        let to_set = CloseFlags::default().with(role);

        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE chats SET
                client_close_flag = client_close_flag OR $2,
                freelancer_close_flag = freelancer_close_flag OR $3,
                status_id = CASE
                    WHEN (client_close_flag OR $2) AND (freelancer_close_flag OR $3)
                    THEN $4 ELSE status_id
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(chat) = sqlx::query_as::<_, Chat>(&update_query)
            .bind(chat_id)
            .bind(to_set.client)
            .bind(to_set.freelancer)
            .bind(ChatStatus::Closed.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut newly_closed = false;
        if chat.is_closed() {
            let result = sqlx::query(
                "UPDATE projects SET status_id = $2, completed_at = NOW()
                 WHERE id = $1 AND status_id <> $2",
            )
            .bind(chat.project_id)
            .bind(ProjectStatus::Completed.id())
            .execute(&mut *tx)
            .await?;
            newly_closed = result.rows_affected() > 0;
        }

        tx.commit().await?;
        Ok(Some(CloseFlagOutcome { chat, newly_closed }))
    }
}
