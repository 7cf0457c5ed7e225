//! Repository for the `testimonials` table.

use sqlx::PgPool;
use worklane_core::types::DbId;

use crate::models::testimonial::{CreateTestimonial, Testimonial};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, profile_user_id, author_id, body, rating, created_at";

/// Provides CRUD operations for testimonials.
pub struct TestimonialRepo;

impl TestimonialRepo {
    /// Insert a testimonial on a user's profile, returning the created row.
    pub async fn create(
        pool: &PgPool,
        profile_user_id: DbId,
        author_id: DbId,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials (profile_user_id, author_id, body, rating)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(profile_user_id)
            .bind(author_id)
            .bind(&input.body)
            .bind(input.rating)
            .fetch_one(pool)
            .await
    }

    /// List testimonials left on a user's profile, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        profile_user_id: DbId,
    ) -> Result<Vec<Testimonial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM testimonials WHERE profile_user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(profile_user_id)
            .fetch_all(pool)
            .await
    }
}
