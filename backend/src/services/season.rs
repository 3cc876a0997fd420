//! Growing season service

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Season, SeasonStatus};

/// Season service for farmer-owned growing seasons
#[derive(Clone)]
pub struct SeasonService {
    db: SqlitePool,
}

/// Input for creating a season
#[derive(Debug, Deserialize)]
pub struct CreateSeasonInput {
    pub name: String,
    pub crop: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub expected_yield_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Input for updating a season
#[derive(Debug, Deserialize)]
pub struct UpdateSeasonInput {
    pub name: Option<String>,
    pub crop: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub expected_yield_kg: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SeasonRow {
    id: Uuid,
    farmer_id: Uuid,
    name: String,
    crop: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    expected_yield_kg: Option<f64>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SeasonRow {
    fn into_season(self) -> AppResult<Season> {
        let status = SeasonStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown season status in database: {}", self.status))
        })?;
        Ok(Season {
            id: self.id,
            farmer_id: self.farmer_id,
            name: self.name,
            crop: self.crop,
            start_date: self.start_date,
            end_date: self.end_date,
            expected_yield_kg: self.expected_yield_kg,
            status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SEASON_COLUMNS: &str = r#"
    id, farmer_id, name, crop, start_date, end_date, expected_yield_kg,
    status, notes, created_at, updated_at
"#;

impl SeasonService {
    /// Create a new SeasonService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all seasons for a farmer
    pub async fn list_seasons(&self, farmer_id: Uuid) -> AppResult<Vec<Season>> {
        let rows = sqlx::query_as::<_, SeasonRow>(&format!(
            "SELECT {} FROM seasons WHERE farmer_id = ? ORDER BY start_date DESC",
            SEASON_COLUMNS
        ))
        .bind(farmer_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(SeasonRow::into_season).collect()
    }

    /// Get a season by ID
    pub async fn get_season(&self, season_id: Uuid) -> AppResult<Season> {
        let row = sqlx::query_as::<_, SeasonRow>(&format!(
            "SELECT {} FROM seasons WHERE id = ?",
            SEASON_COLUMNS
        ))
        .bind(season_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Season".to_string()))?;

        row.into_season()
    }

    /// Create a season owned by the calling farmer
    pub async fn create_season(
        &self,
        farmer_id: Uuid,
        input: CreateSeasonInput,
    ) -> AppResult<Season> {
        if let (Some(end), start) = (input.end_date, input.start_date) {
            if end < start {
                return Err(AppError::Validation {
                    field: "end_date".to_string(),
                    message: "End date cannot be before start date".to_string(),
                    message_vi: "Ngày kết thúc không thể trước ngày bắt đầu".to_string(),
                });
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO seasons (id, farmer_id, name, crop, start_date, end_date,
                                 expected_yield_kg, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'planned', ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(farmer_id)
        .bind(&input.name)
        .bind(&input.crop)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.expected_yield_kg)
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.get_season(id).await
    }

    /// Update a season's descriptive fields; ownership checked
    pub async fn update_season(
        &self,
        caller_id: Uuid,
        season_id: Uuid,
        input: UpdateSeasonInput,
    ) -> AppResult<Season> {
        let current = self.get_season(season_id).await?;
        AppError::ensure_owner(current.farmer_id, caller_id)?;

        let name = input.name.unwrap_or(current.name);
        let crop = input.crop.unwrap_or(current.crop);
        let start_date = input.start_date.unwrap_or(current.start_date);
        let end_date = input.end_date.or(current.end_date);
        let expected_yield_kg = input.expected_yield_kg.or(current.expected_yield_kg);
        let notes = input.notes.or(current.notes);

        sqlx::query(
            r#"
            UPDATE seasons
            SET name = ?, crop = ?, start_date = ?, end_date = ?,
                expected_yield_kg = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&crop)
        .bind(start_date)
        .bind(end_date)
        .bind(expected_yield_kg)
        .bind(&notes)
        .bind(Utc::now())
        .bind(season_id)
        .execute(&self.db)
        .await?;

        self.get_season(season_id).await
    }

    /// Apply a lifecycle transition; ownership and transition validity checked
    pub async fn change_status(
        &self,
        caller_id: Uuid,
        season_id: Uuid,
        next: SeasonStatus,
    ) -> AppResult<Season> {
        let current = self.get_season(season_id).await?;
        AppError::ensure_owner(current.farmer_id, caller_id)?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot move season from {} to {}",
                current.status, next
            )));
        }

        sqlx::query("UPDATE seasons SET status = ?, updated_at = ? WHERE id = ?")
            .bind(next.as_str())
            .bind(Utc::now())
            .bind(season_id)
            .execute(&self.db)
            .await?;

        self.get_season(season_id).await
    }

    /// Delete a season; ownership checked
    pub async fn delete_season(&self, caller_id: Uuid, season_id: Uuid) -> AppResult<()> {
        let current = self.get_season(season_id).await?;
        AppError::ensure_owner(current.farmer_id, caller_id)?;

        sqlx::query("DELETE FROM seasons WHERE id = ?")
            .bind(season_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
