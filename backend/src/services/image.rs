//! Image metadata service
//!
//! Registers and lists image records; file bytes live on an external store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Image;

/// Image service for ownership-scoped image metadata
#[derive(Clone)]
pub struct ImageService {
    db: SqlitePool,
}

/// Input for registering an image
#[derive(Debug, Deserialize)]
pub struct CreateImageInput {
    pub url: String,
    pub caption: Option<String>,
    pub content_type: Option<String>,
    pub season_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    owner_id: Uuid,
    season_id: Option<Uuid>,
    product_id: Option<Uuid>,
    url: String,
    caption: Option<String>,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Image {
            id: row.id,
            owner_id: row.owner_id,
            season_id: row.season_id,
            product_id: row.product_id,
            url: row.url,
            caption: row.caption,
            content_type: row.content_type,
            created_at: row.created_at,
        }
    }
}

const IMAGE_COLUMNS: &str =
    "id, owner_id, season_id, product_id, url, caption, content_type, created_at";

impl ImageService {
    /// Create a new ImageService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Register image metadata for the calling user
    ///
    /// A referenced season or product must exist and belong to the caller.
    pub async fn create_image(&self, owner_id: Uuid, input: CreateImageInput) -> AppResult<Image> {
        if input.url.trim().is_empty() {
            return Err(AppError::Validation {
                field: "url".to_string(),
                message: "Image URL is required".to_string(),
                message_vi: "Cần có URL ảnh".to_string(),
            });
        }

        if let Some(season_id) = input.season_id {
            let season_owner =
                sqlx::query_scalar::<_, Uuid>("SELECT farmer_id FROM seasons WHERE id = ?")
                    .bind(season_id)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Season".to_string()))?;
            AppError::ensure_owner(season_owner, owner_id)?;
        }

        if let Some(product_id) = input.product_id {
            let product_owner =
                sqlx::query_scalar::<_, Uuid>("SELECT farmer_id FROM products WHERE id = ?")
                    .bind(product_id)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
            AppError::ensure_owner(product_owner, owner_id)?;
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO images (id, owner_id, season_id, product_id, url, caption, content_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(input.season_id)
        .bind(input.product_id)
        .bind(&input.url)
        .bind(&input.caption)
        .bind(&input.content_type)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.get_image(id).await
    }

    /// Get an image record by ID
    pub async fn get_image(&self, image_id: Uuid) -> AppResult<Image> {
        let row = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {} FROM images WHERE id = ?",
            IMAGE_COLUMNS
        ))
        .bind(image_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image".to_string()))?;

        Ok(row.into())
    }

    /// List image records owned by a user
    pub async fn list_images(&self, owner_id: Uuid) -> AppResult<Vec<Image>> {
        let rows = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {} FROM images WHERE owner_id = ? ORDER BY created_at DESC",
            IMAGE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Image::from).collect())
    }

    /// List images attached to a product (public, used by traceability)
    pub async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<Image>> {
        let rows = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {} FROM images WHERE product_id = ? ORDER BY created_at ASC",
            IMAGE_COLUMNS
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Image::from).collect())
    }

    /// Delete an image record; ownership checked
    pub async fn delete_image(&self, caller_id: Uuid, image_id: Uuid) -> AppResult<()> {
        let image = self.get_image(image_id).await?;
        AppError::ensure_owner(image.owner_id, caller_id)?;

        sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(image_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
