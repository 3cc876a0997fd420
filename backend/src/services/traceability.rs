//! Product traceability service for public QR code landing pages
//!
//! Aggregates the public view of a product: listing snapshot, farmer profile,
//! latest approved ESG verification, season summary, images, and the result
//! of re-deriving the trace hash from current record state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::BlockchainClient;
use crate::models::{EsgVerification, Image, Product};
use crate::services::{EsgService, ImageService, ProductService};
use shared::trace::{verify_trace_hash, TraceAttributes};

/// Traceability service for public product information
#[derive(Clone)]
pub struct TraceabilityService {
    db: SqlitePool,
    blockchain: BlockchainClient,
}

/// Complete traceability view for a product
#[derive(Debug, Serialize)]
pub struct TraceabilityView {
    pub product: ProductInfo,
    pub farmer: FarmerInfo,
    pub season: Option<SeasonInfo>,
    pub esg: Option<EsgInfo>,
    pub images: Vec<ImageInfo>,
    pub verification: VerificationInfo,
}

/// Product snapshot (public fields only)
#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub traceability_code: String,
    pub name: String,
    pub category: String,
    pub origin: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub quality_standards: Vec<String>,
    pub certifications: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Farmer information (limited for public view)
#[derive(Debug, Serialize)]
pub struct FarmerInfo {
    pub display_name: String,
    pub province: Option<String>,
}

/// Season summary
#[derive(Debug, Serialize)]
pub struct SeasonInfo {
    pub name: String,
    pub crop: String,
    pub start_date: NaiveDate,
    pub status: String,
}

/// ESG summary from the latest approved verification
#[derive(Debug, Serialize)]
pub struct EsgInfo {
    pub overall_score: Option<f64>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Image reference for the public gallery
#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub url: String,
    pub caption: Option<String>,
}

/// Outcome of comparing the stored hash against a fresh recompute
#[derive(Debug, Serialize)]
pub struct VerificationInfo {
    pub verified: bool,
    pub stored_hash: String,
    /// Hash anchored on chain, when the mirror is enabled
    pub anchored_hash: Option<String>,
}

/// QR payload returned to the product owner
#[derive(Debug, Serialize)]
pub struct QrPayload {
    pub traceability_code: String,
    pub trace_url: String,
    pub trace_hash: String,
}

impl TraceabilityService {
    /// Create a new TraceabilityService instance
    pub fn new(db: SqlitePool, blockchain: BlockchainClient) -> Self {
        Self { db, blockchain }
    }

    /// Get the complete public traceability view for a traceability code
    pub async fn get_trace_view(&self, code: &str) -> AppResult<TraceabilityView> {
        let product = ProductService::new(self.db.clone()).get_by_code(code).await?;

        let farmer = self.get_farmer_info(product.farmer_id).await?;
        let season = self.get_season_info(&product).await?;
        let esg = EsgService::new(self.db.clone())
            .latest_approved(product.farmer_id)
            .await?
            .map(|v: EsgVerification| EsgInfo {
                overall_score: v.overall_score,
                reviewed_at: v.reviewed_at,
            });
        let images = ImageService::new(self.db.clone())
            .list_for_product(product.id)
            .await?
            .into_iter()
            .map(|i: Image| ImageInfo {
                url: i.url,
                caption: i.caption,
            })
            .collect();

        let verification = self.verify_product(&product).await?;

        Ok(TraceabilityView {
            product: ProductInfo {
                traceability_code: product.traceability_code,
                name: product.name,
                category: product.category,
                origin: product.origin,
                harvest_date: product.harvest_date,
                quality_standards: product.quality_standards,
                certifications: product.certifications,
                created_at: product.created_at,
            },
            farmer,
            season,
            esg,
            images,
            verification,
        })
    }

    /// QR payload for a product; only the owning farmer may request it
    pub async fn get_qr_payload(
        &self,
        caller_id: Uuid,
        product_id: Uuid,
        base_url: &str,
    ) -> AppResult<QrPayload> {
        let product = ProductService::new(self.db.clone()).get_product(product_id).await?;
        AppError::ensure_owner(product.farmer_id, caller_id)?;

        Ok(QrPayload {
            trace_url: Self::trace_url(base_url, &product.traceability_code),
            traceability_code: product.traceability_code,
            trace_hash: product.trace_hash,
        })
    }

    /// Public URL encoded in a product's QR code
    pub fn trace_url(base_url: &str, traceability_code: &str) -> String {
        format!("{}/trace/{}", base_url, traceability_code)
    }

    /// Recompute the fingerprint from current record state and compare
    async fn verify_product(&self, product: &Product) -> AppResult<VerificationInfo> {
        let attrs = TraceAttributes {
            name: product.name.clone(),
            farmer_id: product.farmer_id,
            harvest_date: product.harvest_date,
            origin: product.origin.clone(),
            quality_standards: product.quality_standards.clone(),
            certifications: product.certifications.clone(),
            created_at: product.created_at,
        };
        let verified = verify_trace_hash(&attrs, &product.trace_hash);

        // The chain read is best-effort; a failing mirror never breaks the view
        let anchored_hash = if self.blockchain.is_enabled() {
            self.blockchain
                .read_anchored_hash(&product.traceability_code)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("blockchain read failed: {}", e);
                    None
                })
        } else {
            None
        };

        Ok(VerificationInfo {
            verified,
            stored_hash: product.trace_hash.clone(),
            anchored_hash,
        })
    }

    async fn get_farmer_info(&self, farmer_id: Uuid) -> AppResult<FarmerInfo> {
        let row = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT display_name, province FROM user_profiles WHERE user_id = ?",
        )
        .bind(farmer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farmer profile".to_string()))?;

        Ok(FarmerInfo {
            display_name: row.0,
            province: row.1,
        })
    }

    async fn get_season_info(&self, product: &Product) -> AppResult<Option<SeasonInfo>> {
        let Some(season_id) = product.season_id else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, (String, String, NaiveDate, String)>(
            "SELECT name, crop, start_date, status FROM seasons WHERE id = ?",
        )
        .bind(season_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| SeasonInfo {
            name: r.0,
            crop: r.1,
            start_date: r.2,
            status: r.3,
        }))
    }
}
