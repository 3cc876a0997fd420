//! Shared types and models for the AgroConnect marketplace
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system.

pub mod matching;
pub mod models;
pub mod trace;
pub mod types;
pub mod validation;

pub use matching::*;
pub use models::*;
pub use trace::*;
pub use types::*;
pub use validation::*;
