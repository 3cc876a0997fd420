//! Product listing models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product listed by a farmer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub season_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    /// Product type used by partner matching (e.g. "coffee", "rice")
    pub category: String,
    pub price: f64,
    pub unit: String,
    pub quantity: f64,
    pub harvest_date: Option<NaiveDate>,
    /// Human-readable origin location
    pub origin: Option<String>,
    pub quality_standards: Vec<String>,
    pub certifications: Vec<String>,
    pub status: ProductStatus,
    /// Public code printed in the QR label
    pub traceability_code: String,
    /// SHA-256 fingerprint of the static attributes, set once at creation
    pub trace_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Availability of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    SoldOut,
    Withdrawn,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::SoldOut => "sold_out",
            ProductStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(ProductStatus::Available),
            "sold_out" => Some(ProductStatus::SoldOut),
            "withdrawn" => Some(ProductStatus::Withdrawn),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
