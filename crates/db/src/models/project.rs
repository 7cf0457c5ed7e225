//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use worklane_core::lifecycle::ProjectState;
use worklane_core::status::{ProjectStatus, StatusId};
use worklane_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub budget_cents: i64,
    pub category: String,
    pub skills_required: Vec<String>,
    pub deadline: Timestamp,
    pub status_id: StatusId,
    pub selected_freelancer_id: Option<DbId>,
    pub confirmed: bool,
    pub chat_id: Option<DbId>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The lifecycle-relevant slice of this row, for the pure guards in
    /// `worklane_core::lifecycle`.
    ///
    /// An unknown `status_id` cannot occur for rows written through the
    /// repositories; fall back to Dispute so guards reject everything.
    pub fn state(&self) -> ProjectState {
        ProjectState {
            status: ProjectStatus::from_id(self.status_id).unwrap_or(ProjectStatus::Dispute),
            owner_id: self.owner_id,
            selected_freelancer_id: self.selected_freelancer_id,
            confirmed: self.confirmed,
        }
    }
}

/// DTO for creating a new project. All listed fields are required and
/// must be non-empty.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 1))]
    pub budget_cents: i64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1))]
    pub skills_required: Vec<String>,
    pub deadline: Timestamp,
}

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    /// Filter by status ID. Defaults to Open listings.
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// A project plus its applicant set, as returned by the read endpoints.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub applicant_ids: Vec<DbId>,
}
