//! Chat routes: room lookup, messages, close-out handshake.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats/{id}", get(chat::get_by_id))
        .route(
            "/chats/{id}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/chats/{id}/close", patch(chat::close))
}
