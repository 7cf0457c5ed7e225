//! Route definitions, one module per resource.

pub mod auth;
pub mod chat;
pub mod health;
pub mod job;
pub mod profile;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// All versioned API routes, nested under `/api/v1` by the app router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(project::router())
        .merge(chat::router())
        .merge(profile::router())
        .merge(job::router())
}
