//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chat_repo;
pub mod job_repo;
pub mod message_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod session_repo;
pub mod testimonial_repo;
pub mod user_repo;

pub use chat_repo::ChatRepo;
pub use job_repo::JobRepo;
pub use message_repo::MessageRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use testimonial_repo::TestimonialRepo;
pub use user_repo::UserRepo;
