//! Job-board posting entity model and DTOs.
//!
//! Jobs are plain listings with no lifecycle -- unlike projects they carry
//! no applicant set or state machine.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use worklane_core::types::{DbId, Timestamp};

/// A job posting row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub poster_id: DbId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub skills: Vec<String>,
    pub salary_min_cents: Option<i64>,
    pub salary_max_cents: Option<i64>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /jobs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub company: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(range(min = 0))]
    pub salary_min_cents: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max_cents: Option<i64>,
    pub location: Option<String>,
}
