//! ESG verification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ESG (environmental/social/governance) verification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgVerification {
    pub id: Uuid,
    /// The farmer or business being verified
    pub user_id: Uuid,
    /// The expert who reviewed the request, set at review time
    pub expert_id: Option<Uuid>,
    pub status: EsgStatus,
    pub environmental_score: Option<f64>,
    pub social_score: Option<f64>,
    pub governance_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub comments: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a verification request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EsgStatus {
    Pending,
    Approved,
    Rejected,
}

impl EsgStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EsgStatus::Pending => "pending",
            EsgStatus::Approved => "approved",
            EsgStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(EsgStatus::Pending),
            "approved" => Some(EsgStatus::Approved),
            "rejected" => Some(EsgStatus::Rejected),
            _ => None,
        }
    }

    /// Only pending requests can be reviewed
    pub fn can_transition_to(&self, next: EsgStatus) -> bool {
        matches!(
            (self, next),
            (EsgStatus::Pending, EsgStatus::Approved) | (EsgStatus::Pending, EsgStatus::Rejected)
        )
    }
}

impl std::fmt::Display for EsgStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-scores submitted by a reviewing expert, each on a 0-100 scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EsgScores {
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
}

impl EsgScores {
    /// Combined score: arithmetic mean of the three components, one decimal
    pub fn overall(&self) -> f64 {
        let mean = (self.environmental + self.social + self.governance) / 3.0;
        (mean * 10.0).round() / 10.0
    }

    /// All components must be within 0-100
    pub fn is_valid(&self) -> bool {
        [self.environmental, self.social, self.governance]
            .iter()
            .all(|s| (0.0..=100.0).contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esg_status_transitions() {
        assert!(EsgStatus::Pending.can_transition_to(EsgStatus::Approved));
        assert!(EsgStatus::Pending.can_transition_to(EsgStatus::Rejected));
        assert!(!EsgStatus::Approved.can_transition_to(EsgStatus::Rejected));
        assert!(!EsgStatus::Rejected.can_transition_to(EsgStatus::Approved));
        assert!(!EsgStatus::Approved.can_transition_to(EsgStatus::Pending));
    }

    #[test]
    fn test_overall_score_is_mean() {
        let scores = EsgScores {
            environmental: 80.0,
            social: 70.0,
            governance: 90.0,
        };
        assert_eq!(scores.overall(), 80.0);
    }

    #[test]
    fn test_overall_score_rounds_to_one_decimal() {
        let scores = EsgScores {
            environmental: 70.0,
            social: 70.0,
            governance: 71.0,
        };
        assert_eq!(scores.overall(), 70.3);
    }

    #[test]
    fn test_score_validation() {
        let valid = EsgScores {
            environmental: 0.0,
            social: 100.0,
            governance: 55.5,
        };
        assert!(valid.is_valid());

        let invalid = EsgScores {
            environmental: 101.0,
            social: 50.0,
            governance: 50.0,
        };
        assert!(!invalid.is_valid());
    }
}
