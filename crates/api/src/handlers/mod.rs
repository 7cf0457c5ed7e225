//! HTTP handlers, one module per resource.

pub mod auth;
pub mod chat;
pub mod job;
pub mod profile;
pub mod project;
pub mod testimonial;
