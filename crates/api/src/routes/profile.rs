//! Profile and testimonial routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{profile, testimonial};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profiles/me",
            get(profile::get_me).put(profile::upsert_me),
        )
        .route("/profiles/{user_id}", get(profile::get_by_user_id))
        .route(
            "/profiles/{user_id}/testimonials",
            get(testimonial::list).post(testimonial::create),
        )
}
