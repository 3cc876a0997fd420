//! HTTP request handlers

pub mod auth;
pub mod esg;
pub mod health;
pub mod image;
pub mod order;
pub mod partner;
pub mod product;
pub mod profile;
pub mod season;
pub mod trace;

pub use auth::*;
pub use esg::*;
pub use health::*;
pub use image::*;
pub use order::*;
pub use partner::*;
pub use product::*;
pub use profile::*;
pub use season::*;
pub use trace::*;
