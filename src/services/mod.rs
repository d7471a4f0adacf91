//! Business logic services

pub mod auth;
pub mod division;

pub use auth::AuthService;
pub use division::DivisionService;
