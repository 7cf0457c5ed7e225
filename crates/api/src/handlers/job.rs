//! Handlers for the `/jobs` resource: a flat job board with no lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use worklane_core::error::CoreError;
use worklane_core::types::DbId;
use worklane_db::models::job::{CreateJob, Job};
use worklane_db::repositories::JobRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Pagination for `GET /jobs`.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// POST /api/v1/jobs
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<Job>)> {
    input.validate().map_err(AppError::from_validation)?;

    if let (Some(min), Some(max)) = (input.salary_min_cents, input.salary_max_cents) {
        if min > max {
            return Err(AppError::Core(CoreError::Validation(
                "salary_min_cents must not exceed salary_max_cents".into(),
            )));
        }
    }

    let job = JobRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> AppResult<Json<Vec<Job>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);
    let jobs = JobRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Job>> {
    JobRepo::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))
}

/// DELETE /api/v1/jobs/{id}
///
/// Poster-only. The ownership check is part of the DELETE.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;
    if job.poster_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the poster can delete a job".into(),
        )));
    }

    JobRepo::delete_for_poster(&state.pool, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
