//! Handlers for testimonials left on user profiles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use worklane_core::error::CoreError;
use worklane_core::types::DbId;
use worklane_db::models::testimonial::{CreateTestimonial, Testimonial};
use worklane_db::repositories::TestimonialRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::require_user;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/profiles/{user_id}/testimonials
///
/// Leave a testimonial on another user's profile. Writing on your own
/// profile is forbidden.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<DbId>,
    Json(input): Json<CreateTestimonial>,
) -> AppResult<(StatusCode, Json<Testimonial>)> {
    input.validate().map_err(AppError::from_validation)?;

    if user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot leave a testimonial on your own profile".into(),
        )));
    }
    require_user(&state, user_id).await?;

    let testimonial =
        TestimonialRepo::create(&state.pool, user_id, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// GET /api/v1/profiles/{user_id}/testimonials
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<Testimonial>>> {
    require_user(&state, user_id).await?;
    let testimonials = TestimonialRepo::list_for_user(&state.pool, user_id).await?;
    Ok(Json(testimonials))
}
