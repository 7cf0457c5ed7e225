//! Handlers for the `/profiles` resource.

use axum::extract::{Path, State};
use axum::Json;
use validator::Validate;
use worklane_core::error::CoreError;
use worklane_core::types::DbId;
use worklane_db::models::profile::{Profile, UpsertProfile};
use worklane_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::require_user;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// PUT /api/v1/profiles/me
///
/// Create or replace the caller's profile.
pub async fn upsert_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpsertProfile>,
) -> AppResult<Json<Profile>> {
    input.validate().map_err(AppError::from_validation)?;

    let profile = ProfileRepo::upsert(&state.pool, auth.user_id, &input).await?;
    Ok(Json(profile))
}

/// GET /api/v1/profiles/me
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Profile>> {
    find_profile(&state, auth.user_id).await.map(Json)
}

/// GET /api/v1/profiles/{user_id}
///
/// Public profile lookup by user id.
pub async fn get_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Profile>> {
    // 404 on the user, not the profile, when the user itself is unknown.
    require_user(&state, user_id).await?;
    find_profile(&state, user_id).await.map(Json)
}

async fn find_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user_id,
        }))
}
