//! Job-board routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::job;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(job::create).get(job::list))
        .route("/jobs/{id}", get(job::get_by_id).delete(job::delete))
}
