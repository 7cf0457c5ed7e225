//! Project routes: CRUD plus the lifecycle transitions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(project::create).get(project::list))
        .route("/projects/mine", get(project::list_mine))
        .route(
            "/projects/{id}",
            get(project::get_by_id).delete(project::delete),
        )
        .route(
            "/projects/{id}/apply",
            post(project::apply).delete(project::withdraw_application),
        )
        .route("/projects/{id}/accept", post(project::accept))
        .route(
            "/projects/{id}/confirm",
            post(project::confirm).delete(project::withdraw_confirmation),
        )
        .route("/projects/{id}/chat", get(project::get_chat))
}
