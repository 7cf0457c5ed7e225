//! Pure domain layer for the Worklane marketplace.
//!
//! Contains the shared id/timestamp aliases, the error taxonomy, the status
//! lookup-table enums, and the project/chat lifecycle transition rules.
//! No I/O lives here; persistence is in `worklane-db`.

pub mod error;
pub mod lifecycle;
pub mod status;
pub mod types;
