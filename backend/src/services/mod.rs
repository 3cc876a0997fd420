//! Business logic services for the AgroConnect backend

pub mod auth;
pub mod esg;
pub mod image;
pub mod matching;
pub mod order;
pub mod product;
pub mod profile;
pub mod season;
pub mod traceability;

pub use auth::AuthService;
pub use esg::EsgService;
pub use image::ImageService;
pub use matching::MatchingService;
pub use order::OrderService;
pub use product::ProductService;
pub use profile::ProfileService;
pub use season::SeasonService;
pub use traceability::TraceabilityService;
