//! Repository for the `jobs` table.

use sqlx::PgPool;
use worklane_core::types::DbId;

use crate::models::job::{CreateJob, Job};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, poster_id, title, company, description, skills, \
                        salary_min_cents, salary_max_cents, location, created_at, updated_at";

/// Provides CRUD operations for job-board postings.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job posting, returning the created row.
    pub async fn create(
        pool: &PgPool,
        poster_id: DbId,
        input: &CreateJob,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (poster_id, title, company, description, skills, salary_min_cents, salary_max_cents, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(poster_id)
            .bind(&input.title)
            .bind(&input.company)
            .bind(&input.description)
            .bind(&input.skills)
            .bind(input.salary_min_cents)
            .bind(input.salary_max_cents)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a job posting by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List job postings, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a job posting, scoped to its poster. Returns `true` if a row
    /// was removed.
    pub async fn delete_for_poster(
        pool: &PgPool,
        id: DbId,
        poster_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND poster_id = $2")
            .bind(id)
            .bind(poster_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
