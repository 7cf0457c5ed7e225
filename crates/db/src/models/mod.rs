//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (with `Validate` where the
//!   endpoint requires non-empty fields)

pub mod chat;
pub mod job;
pub mod message;
pub mod profile;
pub mod project;
pub mod session;
pub mod testimonial;
pub mod user;
