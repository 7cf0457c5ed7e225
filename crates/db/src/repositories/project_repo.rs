//! Repository for the `projects` and `project_applicants` tables.
//!
//! Owns every lifecycle mutation so the status/selection/confirmed fields
//! only change through the transitions the handlers expose. Multi-row
//! transitions (confirm + chat creation, confirmation withdrawal) run in a
//! single transaction.

use sqlx::PgPool;
use worklane_core::status::{ChatStatus, ProjectStatus};
use worklane_core::types::DbId;

use crate::models::chat::Chat;
use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, budget_cents, category, \
                        skills_required, deadline, status_id, selected_freelancer_id, \
                        confirmed, chat_id, completed_at, created_at, updated_at";

/// Chat columns, used where `confirm` creates the room in the same
/// transaction as the project update.
const CHAT_COLUMNS: &str = "id, project_id, client_id, freelancer_id, client_close_flag, \
                             freelancer_close_flag, status_id, created_at, updated_at";

/// Provides CRUD and lifecycle operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with status Open, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, title, description, budget_cents, category, skills_required, deadline, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget_cents)
            .bind(&input.category)
            .bind(&input.skills_required)
            .bind(input.deadline)
            .bind(ProjectStatus::Open.id())
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects with the given status, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: ProjectStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE status_id = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(status.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a user's own postings regardless of status, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a project. The `confirmed = false` guard is enforced in SQL
    /// so a concurrent confirm cannot slip a delete through.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_unconfirmed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND confirmed = false")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Applicant set ------------------------------------------------------

    /// Add a user to the applicant set. Idempotent: applying twice leaves a
    /// single row. Returns `true` if the application was newly recorded.
    pub async fn add_applicant(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_applicants (project_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// True if the user is currently in the project's applicant set.
    pub async fn is_applicant(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT user_id FROM project_applicants WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// List applicant user ids for a project, oldest application first.
    pub async fn list_applicant_ids(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT user_id FROM project_applicants
             WHERE project_id = $1 ORDER BY applied_at ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Remove a user from the applicant set; if they were the selected
    /// freelancer (necessarily unconfirmed -- confirmed selections go
    /// through `withdraw_confirmation`), clear the selection and reset the
    /// project to Open.
    ///
    /// Returns `true` if an application row was removed.
    pub async fn withdraw_application(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed =
            sqlx::query("DELETE FROM project_applicants WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
                > 0;

        sqlx::query(
            "UPDATE projects SET selected_freelancer_id = NULL, status_id = $3
             WHERE id = $1 AND selected_freelancer_id = $2 AND confirmed = false",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(ProjectStatus::Open.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(removed)
    }

    // -- Lifecycle transitions ----------------------------------------------

    /// Accept (or re-accept) an applicant: sets status InProgress and the
    /// selected freelancer. The `confirmed = false` guard is repeated in
    /// SQL so a racing confirm cannot be overwritten.
    ///
    /// Returns the updated row, or `None` if the project is missing or
    /// already confirmed.
    pub async fn accept_applicant(
        pool: &PgPool,
        project_id: DbId,
        freelancer_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET selected_freelancer_id = $2, status_id = $3
             WHERE id = $1 AND confirmed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(freelancer_id)
            .bind(ProjectStatus::InProgress.id())
            .fetch_optional(pool)
            .await
    }

    /// Confirm the assignment and create the 1:1 chat room in a single
    /// transaction, so `confirmed = true` never exists without a chat.
    ///
    /// Returns `None` if the project is missing, unselected, or already
    /// confirmed (the guard is part of the UPDATE's WHERE clause).
    pub async fn confirm(
        pool: &PgPool,
        project_id: DbId,
        freelancer_id: DbId,
    ) -> Result<Option<(Project, Chat)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let confirm_query = format!(
            "UPDATE projects SET confirmed = true
             WHERE id = $1 AND selected_freelancer_id = $2 AND confirmed = false
             RETURNING {COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&confirm_query)
            .bind(project_id)
            .bind(freelancer_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let chat_query = format!(
            "INSERT INTO chats (project_id, client_id, freelancer_id, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {CHAT_COLUMNS}"
        );
        let chat = sqlx::query_as::<_, Chat>(&chat_query)
            .bind(project_id)
            .bind(project.owner_id)
            .bind(freelancer_id)
            .bind(ChatStatus::Active.id())
            .fetch_one(&mut *tx)
            .await?;

        let stamp_query = format!(
            "UPDATE projects SET chat_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&stamp_query)
            .bind(project_id)
            .bind(chat.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((project, chat)))
    }

    /// Withdraw a confirmed assignment: the project resets to Open (the
    /// selection, confirmed flag, and chat binding are cleared) and the
    /// chat room is closed. One transaction.
    ///
    /// Completed is terminal, and the guard is repeated in SQL so a
    /// close-out that lands concurrently cannot be undone.
    ///
    /// Returns the reset row, or `None` if the project is missing, not
    /// confirmed, or already Completed.
    pub async fn withdraw_confirmation(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let reset_query = format!(
            "UPDATE projects SET
                selected_freelancer_id = NULL,
                confirmed = false,
                chat_id = NULL,
                completed_at = NULL,
                status_id = $2
             WHERE id = $1 AND confirmed = true AND status_id <> $3
             RETURNING {COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&reset_query)
            .bind(project_id)
            .bind(ProjectStatus::Open.id())
            .bind(ProjectStatus::Completed.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE chats SET status_id = $2 WHERE project_id = $1 AND status_id <> $2",
        )
        .bind(project_id)
        .bind(ChatStatus::Closed.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(project))
    }
}
