//! Partner suggestion service
//!
//! Assembles candidate counterparts from the database and delegates scoring
//! to the pure functions in `shared::matching`. Farmers are matched against
//! businesses and vice versa.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{parse_string_list, UserRole};
use shared::matching::{rank_candidates, MatchCandidate, MatchCriteria, PartnerMatch};
use shared::types::GeoPoint;

/// Matching service
#[derive(Clone)]
pub struct MatchingService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    user_id: Uuid,
    display_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    certifications: Option<String>,
    product_types: Option<String>,
    quality_standards: Option<String>,
    esg_score: Option<f64>,
}

impl From<CandidateRow> for MatchCandidate {
    fn from(row: CandidateRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        };
        MatchCandidate {
            user_id: row.user_id,
            name: row.display_name,
            product_types: parse_string_list(row.product_types.as_deref()),
            certifications: parse_string_list(row.certifications.as_deref()),
            quality_standards: parse_string_list(row.quality_standards.as_deref()),
            location,
            esg_score: row.esg_score,
        }
    }
}

impl MatchingService {
    /// Create a new MatchingService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Suggest partners for the requesting user
    ///
    /// Farmers receive business candidates and businesses receive farmer
    /// candidates. When the criteria carry no location, the requester's own
    /// profile location is used for the proximity component.
    pub async fn suggest_partners(
        &self,
        requester_id: Uuid,
        mut criteria: MatchCriteria,
    ) -> AppResult<Vec<PartnerMatch>> {
        let requester_role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = ?")
            .bind(requester_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let requester_role = UserRole::parse(&requester_role).ok_or_else(|| {
            AppError::Internal(format!("unknown role in database: {}", requester_role))
        })?;

        let target_role = match requester_role {
            UserRole::Farmer => UserRole::Business,
            UserRole::Business => UserRole::Farmer,
            _ => return Err(AppError::InsufficientPermissions),
        };

        if criteria.location.is_none() {
            criteria.location = self.requester_location(requester_id).await?;
        }

        let candidates = self.load_candidates(target_role, requester_id).await?;
        Ok(rank_candidates(&criteria, &candidates))
    }

    async fn requester_location(&self, user_id: Uuid) -> AppResult<Option<GeoPoint>> {
        let row = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
            "SELECT latitude, longitude FROM user_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.and_then(|(lat, lng)| match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }))
    }

    /// Load all active users of the target role with their profile and the
    /// overall score of their latest approved ESG verification
    async fn load_candidates(
        &self,
        target_role: UserRole,
        exclude_user: Uuid,
    ) -> AppResult<Vec<MatchCandidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT u.id AS user_id, p.display_name, p.latitude, p.longitude,
                   p.certifications, p.product_types, p.quality_standards,
                   (
                       SELECT e.overall_score
                       FROM esg_verifications e
                       WHERE e.user_id = u.id AND e.status = 'approved'
                       ORDER BY e.reviewed_at DESC
                       LIMIT 1
                   ) AS esg_score
            FROM users u
            JOIN user_profiles p ON p.user_id = u.id
            WHERE u.role = ? AND u.is_active = 1 AND u.id != ?
            ORDER BY u.created_at ASC
            "#,
        )
        .bind(target_role.as_str())
        .bind(exclude_user)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MatchCandidate::from).collect())
    }
}
