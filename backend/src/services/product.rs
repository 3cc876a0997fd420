//! Product listing service
//!
//! Creation derives the traceability code and SHA-256 fingerprint from the
//! product's static attributes. Updates never re-derive the fingerprint:
//! verification is defined as a comparison between the stored digest and a
//! recompute from current state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{parse_string_list, to_json_list, Product, ProductStatus};
use shared::trace::{compute_trace_hash, traceability_code, TraceAttributes};
use shared::validation::validate_positive;

/// Product service for farmer listings
#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub unit: String,
    pub quantity: f64,
    pub harvest_date: Option<NaiveDate>,
    pub origin: Option<String>,
    pub quality_standards: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub season_id: Option<Uuid>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub harvest_date: Option<NaiveDate>,
    pub origin: Option<String>,
    pub quality_standards: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
}

/// Listing filters for the public catalogue
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub farmer_id: Option<Uuid>,
    /// Filters by the listing farmer's profile province
    pub province: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    farmer_id: Uuid,
    season_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    category: String,
    price: f64,
    unit: String,
    quantity: f64,
    harvest_date: Option<NaiveDate>,
    origin: Option<String>,
    quality_standards: Option<String>,
    certifications: Option<String>,
    status: String,
    traceability_code: String,
    trace_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> AppResult<Product> {
        let status = ProductStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown product status in database: {}", self.status))
        })?;
        Ok(Product {
            id: self.id,
            farmer_id: self.farmer_id,
            season_id: self.season_id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            unit: self.unit,
            quantity: self.quantity,
            harvest_date: self.harvest_date,
            origin: self.origin,
            quality_standards: parse_string_list(self.quality_standards.as_deref()),
            certifications: parse_string_list(self.certifications.as_deref()),
            status,
            traceability_code: self.traceability_code,
            trace_hash: self.trace_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = r#"
    id, farmer_id, season_id, name, description, category, price, unit, quantity,
    harvest_date, origin, quality_standards, certifications, status,
    traceability_code, trace_hash, created_at, updated_at
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a product listing with its traceability fingerprint
    pub async fn create_product(
        &self,
        farmer_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
                message_vi: "Cần có tên sản phẩm".to_string(),
            });
        }
        if let Err(msg) = validate_positive(input.price) {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: msg.to_string(),
                message_vi: "Giá phải là số dương".to_string(),
            });
        }
        if let Err(msg) = validate_positive(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
                message_vi: "Số lượng phải là số dương".to_string(),
            });
        }

        if let Some(season_id) = input.season_id {
            let season_owner =
                sqlx::query_scalar::<_, Uuid>("SELECT farmer_id FROM seasons WHERE id = ?")
                    .bind(season_id)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Season".to_string()))?;
            AppError::ensure_owner(season_owner, farmer_id)?;
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let quality_standards = input.quality_standards.unwrap_or_default();
        let certifications = input.certifications.unwrap_or_default();

        let attrs = TraceAttributes {
            name: input.name.clone(),
            farmer_id,
            harvest_date: input.harvest_date,
            origin: input.origin.clone(),
            quality_standards: quality_standards.clone(),
            certifications: certifications.clone(),
            created_at: now,
        };
        let trace_hash = compute_trace_hash(&attrs);
        let code = traceability_code(now, &trace_hash);

        sqlx::query(
            r#"
            INSERT INTO products (id, farmer_id, season_id, name, description, category,
                                  price, unit, quantity, harvest_date, origin,
                                  quality_standards, certifications, status,
                                  traceability_code, trace_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'available', ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(farmer_id)
        .bind(input.season_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(&input.unit)
        .bind(input.quantity)
        .bind(input.harvest_date)
        .bind(&input.origin)
        .bind(to_json_list(&quality_standards))
        .bind(to_json_list(&certifications))
        .bind(&code)
        .bind(&trace_hash)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.get_product(id).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        row.into_product()
    }

    /// Get a product by its public traceability code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE traceability_code = ?",
            PRODUCT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        row.into_product()
    }

    /// Public catalogue listing with optional filters
    pub async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        let columns: String = PRODUCT_COLUMNS
            .split(',')
            .map(|c| format!("pr.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {} FROM products pr
            JOIN user_profiles up ON up.user_id = pr.farmer_id
            WHERE (? IS NULL OR pr.category = ?)
              AND (? IS NULL OR pr.farmer_id = ?)
              AND (? IS NULL OR up.province = ?)
            ORDER BY pr.created_at DESC
            "#,
            columns
        ))
        .bind(&filter.category)
        .bind(&filter.category)
        .bind(filter.farmer_id)
        .bind(filter.farmer_id)
        .bind(&filter.province)
        .bind(&filter.province)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Update a product; ownership checked, fingerprint never re-derived
    pub async fn update_product(
        &self,
        caller_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let current = self.get_product(product_id).await?;
        AppError::ensure_owner(current.farmer_id, caller_id)?;

        if let Some(price) = input.price {
            if let Err(msg) = validate_positive(price) {
                return Err(AppError::Validation {
                    field: "price".to_string(),
                    message: msg.to_string(),
                    message_vi: "Giá phải là số dương".to_string(),
                });
            }
        }
        if let Some(quantity) = input.quantity {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Quantity cannot be negative".to_string(),
                    message_vi: "Số lượng không thể âm".to_string(),
                });
            }
        }

        let name = input.name.unwrap_or(current.name);
        let description = input.description.or(current.description);
        let category = input.category.unwrap_or(current.category);
        let price = input.price.unwrap_or(current.price);
        let unit = input.unit.unwrap_or(current.unit);
        let quantity = input.quantity.unwrap_or(current.quantity);
        let harvest_date = input.harvest_date.or(current.harvest_date);
        let origin = input.origin.or(current.origin);
        let quality_standards = input.quality_standards.unwrap_or(current.quality_standards);
        let certifications = input.certifications.unwrap_or(current.certifications);
        let status = input.status.unwrap_or(current.status);

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, category = ?, price = ?, unit = ?,
                quantity = ?, harvest_date = ?, origin = ?, quality_standards = ?,
                certifications = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(&category)
        .bind(price)
        .bind(&unit)
        .bind(quantity)
        .bind(harvest_date)
        .bind(&origin)
        .bind(to_json_list(&quality_standards))
        .bind(to_json_list(&certifications))
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(product_id)
        .execute(&self.db)
        .await?;

        self.get_product(product_id).await
    }

    /// Delete a product; ownership checked
    pub async fn delete_product(&self, caller_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let current = self.get_product(product_id).await?;
        AppError::ensure_owner(current.farmer_id, caller_id)?;

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
