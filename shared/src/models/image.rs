//! Image metadata model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an uploaded image
///
/// Image bytes live on an external store; this record only tracks ownership
/// and the optional season/product attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub season_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub url: String,
    pub caption: Option<String>,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
}
