//! Repository for the `profiles` table.

use sqlx::PgPool;
use worklane_core::types::DbId;

use crate::models::profile::{Profile, UpsertProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, headline, bio, skills, hourly_rate_cents, \
                        location, website, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert or update the profile for a user, returning the row.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, headline, bio, skills, hourly_rate_cents, location, website)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id)
             DO UPDATE SET
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                skills = EXCLUDED.skills,
                hourly_rate_cents = EXCLUDED.hourly_rate_cents,
                location = EXCLUDED.location,
                website = EXCLUDED.website
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.headline)
            .bind(&input.bio)
            .bind(&input.skills)
            .bind(input.hourly_rate_cents)
            .bind(&input.location)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by the owning user's ID.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
