//! User profile service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{parse_string_list, to_json_list, UserProfile};
use shared::validation::validate_coordinates;

/// Profile service for reading and updating user profiles
#[derive(Clone)]
pub struct ProfileService {
    db: SqlitePool,
}

/// Input for updating a profile; omitted fields keep their current value
#[derive(Debug, Deserialize)]
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub certifications: Option<Vec<String>>,
    pub product_types: Option<Vec<String>>,
    pub quality_standards: Option<Vec<String>>,
    pub website: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    display_name: String,
    description: Option<String>,
    address: Option<String>,
    province: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    certifications: Option<String>,
    product_types: Option<String>,
    quality_standards: Option<String>,
    website: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            user_id: row.user_id,
            display_name: row.display_name,
            description: row.description,
            address: row.address,
            province: row.province,
            latitude: row.latitude,
            longitude: row.longitude,
            certifications: parse_string_list(row.certifications.as_deref()),
            product_types: parse_string_list(row.product_types.as_deref()),
            quality_standards: parse_string_list(row.quality_standards.as_deref()),
            website: row.website,
            updated_at: row.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str = r#"
    user_id, display_name, description, address, province, latitude, longitude,
    certifications, product_types, quality_standards, website, updated_at
"#;

impl ProfileService {
    /// Create a new ProfileService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get a profile by user ID
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles WHERE user_id = ?",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

        Ok(row.into())
    }

    /// Update the caller's own profile
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> AppResult<UserProfile> {
        let current = self.get_profile(user_id).await?;

        let latitude = input.latitude.or(current.latitude);
        let longitude = input.longitude.or(current.longitude);
        if let (Some(lat), Some(lng)) = (latitude, longitude) {
            if let Err(msg) = validate_coordinates(lat, lng) {
                return Err(AppError::Validation {
                    field: "location".to_string(),
                    message: msg.to_string(),
                    message_vi: "Tọa độ không hợp lệ".to_string(),
                });
            }
        }

        let display_name = input.display_name.unwrap_or(current.display_name);
        let description = input.description.or(current.description);
        let address = input.address.or(current.address);
        let province = input.province.or(current.province);
        let certifications = input.certifications.unwrap_or(current.certifications);
        let product_types = input.product_types.unwrap_or(current.product_types);
        let quality_standards = input.quality_standards.unwrap_or(current.quality_standards);
        let website = input.website.or(current.website);

        sqlx::query(
            r#"
            UPDATE user_profiles
            SET display_name = ?, description = ?, address = ?, province = ?,
                latitude = ?, longitude = ?, certifications = ?, product_types = ?,
                quality_standards = ?, website = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&display_name)
        .bind(&description)
        .bind(&address)
        .bind(&province)
        .bind(latitude)
        .bind(longitude)
        .bind(to_json_list(&certifications))
        .bind(to_json_list(&product_types))
        .bind(to_json_list(&quality_standards))
        .bind(&website)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get_profile(user_id).await
    }
}
