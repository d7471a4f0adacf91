//! Request middleware

pub mod auth;
pub mod rbac;

pub use auth::{auth_middleware, AuthUser, Claims};
pub use rbac::{route_guard_middleware, seeded_override, SEEDED_OVERRIDE_HEADER};
