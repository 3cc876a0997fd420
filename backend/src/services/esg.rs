//! ESG verification service
//!
//! Farmers and businesses request verification; ESG experts review pending
//! requests and score them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{EsgScores, EsgStatus, EsgVerification};
use shared::validation::validate_esg_scores;

/// ESG verification service
#[derive(Clone)]
pub struct EsgService {
    db: SqlitePool,
}

/// Review decision submitted by an expert
#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    /// "approved" or "rejected"
    pub decision: String,
    pub scores: Option<EsgScores>,
    pub comments: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct EsgRow {
    id: Uuid,
    user_id: Uuid,
    expert_id: Option<Uuid>,
    status: String,
    environmental_score: Option<f64>,
    social_score: Option<f64>,
    governance_score: Option<f64>,
    overall_score: Option<f64>,
    comments: Option<String>,
    requested_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl EsgRow {
    fn into_verification(self) -> AppResult<EsgVerification> {
        let status = EsgStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown ESG status in database: {}", self.status))
        })?;
        Ok(EsgVerification {
            id: self.id,
            user_id: self.user_id,
            expert_id: self.expert_id,
            status,
            environmental_score: self.environmental_score,
            social_score: self.social_score,
            governance_score: self.governance_score,
            overall_score: self.overall_score,
            comments: self.comments,
            requested_at: self.requested_at,
            reviewed_at: self.reviewed_at,
        })
    }
}

const ESG_COLUMNS: &str = r#"
    id, user_id, expert_id, status, environmental_score, social_score,
    governance_score, overall_score, comments, requested_at, reviewed_at
"#;

impl EsgService {
    /// Create a new EsgService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Request a verification for the calling user
    ///
    /// Only one pending request per user is allowed at a time.
    pub async fn request_verification(&self, user_id: Uuid) -> AppResult<EsgVerification> {
        let pending = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM esg_verifications WHERE user_id = ? AND status = 'pending'",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if pending > 0 {
            return Err(AppError::Conflict {
                resource: "esg_verification".to_string(),
                message: "A pending verification request already exists".to_string(),
                message_vi: "Đã có yêu cầu xác minh đang chờ xử lý".to_string(),
            });
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO esg_verifications (id, user_id, status, requested_at)
            VALUES (?, ?, 'pending', ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.db)
        .await?;

        self.get_verification(id).await
    }

    /// List pending requests for expert review, oldest first
    pub async fn list_pending(&self) -> AppResult<Vec<EsgVerification>> {
        let rows = sqlx::query_as::<_, EsgRow>(&format!(
            "SELECT {} FROM esg_verifications WHERE status = 'pending' ORDER BY requested_at ASC",
            ESG_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(EsgRow::into_verification).collect()
    }

    /// Get a verification record by ID
    pub async fn get_verification(&self, id: Uuid) -> AppResult<EsgVerification> {
        let row = sqlx::query_as::<_, EsgRow>(&format!(
            "SELECT {} FROM esg_verifications WHERE id = ?",
            ESG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("ESG verification".to_string()))?;

        row.into_verification()
    }

    /// Review a pending request as an expert
    pub async fn review(
        &self,
        expert_id: Uuid,
        verification_id: Uuid,
        input: ReviewInput,
    ) -> AppResult<EsgVerification> {
        let current = self.get_verification(verification_id).await?;

        let next = EsgStatus::parse(&input.decision).ok_or_else(|| AppError::Validation {
            field: "decision".to_string(),
            message: "Decision must be 'approved' or 'rejected'".to_string(),
            message_vi: "Quyết định phải là 'approved' hoặc 'rejected'".to_string(),
        })?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot move verification from {} to {}",
                current.status, next
            )));
        }

        // Experts cannot review their own business
        if current.user_id == expert_id {
            return Err(AppError::InsufficientPermissions);
        }

        let scores = match next {
            EsgStatus::Approved => {
                let scores = input.scores.ok_or_else(|| AppError::Validation {
                    field: "scores".to_string(),
                    message: "Approval requires environmental, social and governance scores"
                        .to_string(),
                    message_vi: "Phê duyệt cần đủ ba điểm thành phần".to_string(),
                })?;
                if let Err(msg) = validate_esg_scores(&scores) {
                    return Err(AppError::Validation {
                        field: "scores".to_string(),
                        message: msg.to_string(),
                        message_vi: "Điểm ESG phải nằm trong khoảng 0-100".to_string(),
                    });
                }
                Some(scores)
            }
            _ => input.scores,
        };

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE esg_verifications
            SET status = ?, expert_id = ?, environmental_score = ?, social_score = ?,
                governance_score = ?, overall_score = ?, comments = ?, reviewed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(next.as_str())
        .bind(expert_id)
        .bind(scores.map(|s| s.environmental))
        .bind(scores.map(|s| s.social))
        .bind(scores.map(|s| s.governance))
        .bind(scores.map(|s| s.overall()))
        .bind(&input.comments)
        .bind(now)
        .bind(verification_id)
        .execute(&self.db)
        .await?;

        self.get_verification(verification_id).await
    }

    /// Latest approved verification for a user, if any
    pub async fn latest_approved(&self, user_id: Uuid) -> AppResult<Option<EsgVerification>> {
        let row = sqlx::query_as::<_, EsgRow>(&format!(
            r#"
            SELECT {} FROM esg_verifications
            WHERE user_id = ? AND status = 'approved'
            ORDER BY reviewed_at DESC
            LIMIT 1
            "#,
            ESG_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(EsgRow::into_verification).transpose()
    }

    /// Verification history for the calling user
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<EsgVerification>> {
        let rows = sqlx::query_as::<_, EsgRow>(&format!(
            "SELECT {} FROM esg_verifications WHERE user_id = ? ORDER BY requested_at DESC",
            ESG_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(EsgRow::into_verification).collect()
    }
}
