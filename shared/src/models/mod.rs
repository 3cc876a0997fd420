//! Domain models for the AgroConnect marketplace

mod esg;
mod image;
mod order;
mod product;
mod profile;
mod season;
mod user;

pub use esg::*;
pub use image::*;
pub use order::*;
pub use product::*;
pub use profile::*;
pub use season::*;
pub use user::*;
