//! Handlers for the `/chats` resource: room lookup, messages, and the
//! two-party close-out handshake.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use worklane_core::error::CoreError;
use worklane_core::types::DbId;
use worklane_db::models::chat::Chat;
use worklane_db::models::message::{ChatMessage, SendMessage};
use worklane_db::repositories::{ChatRepo, MessageRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Pagination for `GET /chats/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for `PATCH /chats/{id}/close`.
#[derive(Debug, Serialize)]
pub struct CloseResponse {
    #[serde(flatten)]
    pub chat: Chat,
    /// True when this call closed the chat and completed the project.
    pub project_completed: bool,
}

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

/// GET /api/v1/chats/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Chat>> {
    let chat = require_participant_chat(&state, id, auth.user_id).await?;
    Ok(Json(chat))
}

/// GET /api/v1/chats/{id}/messages
///
/// Oldest first. Closed chats stay readable.
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<MessageListQuery>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    require_participant_chat(&state, id, auth.user_id).await?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let messages = MessageRepo::list_for_chat(&state.pool, id, limit, offset).await?;
    Ok(Json(messages))
}

/// POST /api/v1/chats/{id}/messages
///
/// Participants only; the chat must still be Active.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<ChatMessage>)> {
    input.validate().map_err(AppError::from_validation)?;
    let chat = require_participant_chat(&state, id, auth.user_id).await?;

    if chat.is_closed() {
        return Err(AppError::Core(CoreError::Conflict(
            "Chat is closed".into(),
        )));
    }

    // The INSERT re-checks Active, so a close that lands between the read
    // above and here still rejects the message.
    let message = MessageRepo::insert(&state.pool, id, auth.user_id, &input.body)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Chat is closed".into())))?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// PATCH /api/v1/chats/{id}/close
///
/// Set the caller's ready-to-close flag. When both parties have set
/// theirs, the chat closes and the project is marked Completed, all in one
/// transaction. Repeating the call is a no-op.
pub async fn close(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CloseResponse>> {
    let chat = require_participant_chat(&state, id, auth.user_id).await?;

    let role = chat.role_of(auth.user_id).ok_or_else(|| {
        AppError::Core(CoreError::Forbidden("Not a participant of this chat".into()))
    })?;

    let outcome = ChatRepo::set_close_flag(&state.pool, id, role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chat",
            id,
        }))?;

    if outcome.newly_closed {
        tracing::info!(
            chat_id = id,
            project_id = outcome.chat.project_id,
            "Both parties closed; project completed"
        );
    }

    Ok(Json(CloseResponse {
        chat: outcome.chat,
        project_completed: outcome.newly_closed,
    }))
}

/// Fetch a chat and require the caller to be one of its two parties.
async fn require_participant_chat(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<Chat> {
    let chat = ChatRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chat",
            id,
        }))?;
    if !chat.is_participant(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a participant of this chat".into(),
        )));
    }
    Ok(chat)
}
