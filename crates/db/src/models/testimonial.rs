//! Testimonial entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use worklane_core::types::{DbId, Timestamp};

/// A testimonial row from the `testimonials` table. Attached to the
/// profile owner's user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub profile_user_id: DbId,
    pub author_id: DbId,
    pub body: String,
    pub rating: i16,
    pub created_at: Timestamp,
}

/// Request body for `POST /profiles/{user_id}/testimonials`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestimonial {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
}
