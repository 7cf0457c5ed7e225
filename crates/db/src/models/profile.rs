//! Freelancer/client profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use worklane_core::types::{DbId, Timestamp};

/// A profile row from the `profiles` table (1:1 with `users`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub headline: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /profiles/me`. Upserts the caller's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfile {
    #[validate(length(min = 1, max = 160))]
    pub headline: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}
