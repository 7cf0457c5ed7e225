//! Handlers for the `/projects` resource: CRUD plus the lifecycle
//! transitions (apply, accept, confirm, withdraw, close-out is on the chat).
//!
//! Authorization follows one rule: the acting user always comes from
//! [`AuthUser`]; ids in request bodies only ever name the other party and
//! are validated against the database.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use worklane_core::error::CoreError;
use worklane_core::lifecycle;
use worklane_core::status::ProjectStatus;
use worklane_core::types::DbId;
use worklane_db::models::chat::Chat;
use worklane_db::models::project::{CreateProject, Project, ProjectDetail, ProjectListQuery};
use worklane_db::models::user::{ROLE_CLIENT, ROLE_FREELANCER};
use worklane_db::repositories::{ChatRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/accept`.
#[derive(Debug, Deserialize)]
pub struct AcceptApplicant {
    pub freelancer_id: DbId,
}

/// Response for `POST /projects/{id}/confirm`: the confirmed project and
/// its freshly created chat room.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub project: Project,
    pub chat: Chat,
}

/// Default / maximum page sizes for list endpoints.
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

fn page(query: &ProjectListQuery) -> (i64, i64) {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// POST /api/v1/projects
///
/// Clients post projects. All fields are required non-empty.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if auth.role != ROLE_CLIENT {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only clients can post projects".into(),
        )));
    }
    input.validate().map_err(AppError::from_validation)?;

    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(project_id = project.id, owner_id = auth.user_id, "Created project");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Public listing. Defaults to Open projects; `status_id` filters.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let status = match query.status_id {
        Some(id) => ProjectStatus::from_id(id).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown status_id {id}")))
        })?,
        None => ProjectStatus::Open,
    };
    let (limit, offset) = page(&query);

    let projects = ProjectRepo::list_by_status(&state.pool, status, limit, offset).await?;
    let details = with_applicants(&state, projects).await?;
    Ok(Json(details))
}

/// GET /api/v1/projects/mine
///
/// The caller's own postings, any status.
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let (limit, offset) = page(&query);
    let projects = ProjectRepo::list_by_owner(&state.pool, auth.user_id, limit, offset).await?;
    let details = with_applicants(&state, projects).await?;
    Ok(Json(details))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = require_project(&state, id).await?;
    let applicant_ids = ProjectRepo::list_applicant_ids(&state.pool, id).await?;
    Ok(Json(ProjectDetail {
        project,
        applicant_ids,
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Owner-only, and only while the assignment is unconfirmed.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = require_project(&state, id).await?;
    lifecycle::check_delete(project.state(), auth.user_id)?;

    // The SQL re-checks `confirmed = false` so a concurrent confirm wins.
    let deleted = ProjectRepo::delete_unconfirmed(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::Conflict(
            "A confirmed project cannot be deleted".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/apply
///
/// Freelancer applies to an Open project. Idempotent: re-applying is a
/// no-op.
pub async fn apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if auth.role != ROLE_FREELANCER {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only freelancers can apply".into(),
        )));
    }
    let project = require_project(&state, id).await?;
    lifecycle::check_apply(project.state(), auth.user_id)?;

    let newly_applied = ProjectRepo::add_applicant(&state.pool, id, auth.user_id).await?;
    if newly_applied {
        tracing::info!(project_id = id, user_id = auth.user_id, "New application");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/projects/{id}/apply
///
/// Withdraw an application. If the caller was the (unconfirmed) selected
/// freelancer, the selection is cleared and the project reset to Open. A
/// confirmed freelancer must withdraw the confirmation instead.
pub async fn withdraw_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = require_project(&state, id).await?;

    if project.confirmed && project.selected_freelancer_id == Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Conflict(
            "Assignment is confirmed; withdraw the confirmation instead".into(),
        )));
    }

    let removed = ProjectRepo::withdraw_application(&state.pool, id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/accept
///
/// Owner accepts (or re-accepts) an applicant: status becomes InProgress
/// and the selection is recorded. Valid only while unconfirmed.
pub async fn accept(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AcceptApplicant>,
) -> AppResult<Json<Project>> {
    let project = require_project(&state, id).await?;
    lifecycle::check_accept(project.state(), auth.user_id)?;

    if !ProjectRepo::is_applicant(&state.pool, id, input.freelancer_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "freelancer_id is not an applicant of this project".into(),
        )));
    }

    let updated = ProjectRepo::accept_applicant(&state.pool, id, input.freelancer_id)
        .await?
        .ok_or_else(|| {
            // Lost a race with a confirm; the SQL guard refused the update.
            AppError::Core(CoreError::Conflict("Assignment is already confirmed".into()))
        })?;

    tracing::info!(
        project_id = id,
        freelancer_id = input.freelancer_id,
        "Accepted applicant"
    );
    Ok(Json(updated))
}

/// POST /api/v1/projects/{id}/confirm
///
/// The selected freelancer confirms the assignment; the 1:1 chat room is
/// created in the same transaction.
pub async fn confirm(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ConfirmResponse>> {
    let project = require_project(&state, id).await?;
    lifecycle::check_confirm(project.state(), auth.user_id)?;

    let (project, chat) = ProjectRepo::confirm(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Project is already confirmed".into()))
        })?;

    tracing::info!(project_id = id, chat_id = chat.id, "Assignment confirmed, chat created");
    Ok(Json(ConfirmResponse { project, chat }))
}

/// DELETE /api/v1/projects/{id}/confirm
///
/// The selected freelancer withdraws a confirmed assignment. The project
/// resets to Open and the chat room is closed; nothing is deleted.
pub async fn withdraw_confirmation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = require_project(&state, id).await?;
    lifecycle::check_withdraw_confirmation(project.state(), auth.user_id)?;

    // The repo re-checks confirmed/Completed, so a close-out that lands
    // between the guard and the UPDATE still refuses the withdrawal.
    let project = ProjectRepo::withdraw_confirmation(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Confirmation can no longer be withdrawn".into(),
            ))
        })?;

    tracing::info!(project_id = id, "Confirmation withdrawn, project reset to Open");
    Ok(Json(project))
}

/// GET /api/v1/projects/{id}/chat
///
/// The chat bound to a confirmed project, resolved through the project's
/// `chat_id` stamp. Participants only.
pub async fn get_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Chat>> {
    let project = require_project(&state, id).await?;
    let chat_id = project.chat_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Chat",
        id,
    }))?;
    let chat = ChatRepo::find_by_id(&state.pool, chat_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chat",
            id: chat_id,
        }))?;
    if !chat.is_participant(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a participant of this chat".into(),
        )));
    }
    Ok(Json(chat))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Attach applicant id sets to a page of projects.
async fn with_applicants(
    state: &AppState,
    projects: Vec<Project>,
) -> AppResult<Vec<ProjectDetail>> {
    let mut details = Vec::with_capacity(projects.len());
    for project in projects {
        let applicant_ids = ProjectRepo::list_applicant_ids(&state.pool, project.id).await?;
        details.push(ProjectDetail {
            project,
            applicant_ids,
        });
    }
    Ok(details)
}
