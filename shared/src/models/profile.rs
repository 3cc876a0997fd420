//! User profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extended profile attached to a user account
///
/// Farmers describe their farm and what they grow; businesses describe the
/// product types they want to source. Location and certifications feed the
/// partner matching component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub certifications: Vec<String>,
    pub product_types: Vec<String>,
    pub quality_standards: Vec<String>,
    pub website: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Location as a coordinate pair, if both components are present
    pub fn location(&self) -> Option<crate::types::GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(crate::types::GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}
