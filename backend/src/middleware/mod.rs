//! HTTP middleware for the AgroConnect backend

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
