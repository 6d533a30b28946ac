//! Business logic independent of the HTTP layer.

pub mod access;
pub mod auth;
pub mod recurrence;
pub mod roles;
