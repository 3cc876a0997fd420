//! Growing season models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A growing season declared by a farmer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub name: String,
    pub crop: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub expected_yield_kg: Option<f64>,
    pub status: SeasonStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Season lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    Planned,
    InProgress,
    Harvested,
    Completed,
    Cancelled,
}

impl SeasonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonStatus::Planned => "planned",
            SeasonStatus::InProgress => "in_progress",
            SeasonStatus::Harvested => "harvested",
            SeasonStatus::Completed => "completed",
            SeasonStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(SeasonStatus::Planned),
            "in_progress" => Some(SeasonStatus::InProgress),
            "harvested" => Some(SeasonStatus::Harvested),
            "completed" => Some(SeasonStatus::Completed),
            "cancelled" => Some(SeasonStatus::Cancelled),
            _ => None,
        }
    }

    /// Allowed forward transitions; completed and cancelled are terminal
    pub fn can_transition_to(&self, next: SeasonStatus) -> bool {
        use SeasonStatus::*;
        matches!(
            (self, next),
            (Planned, InProgress)
                | (Planned, Cancelled)
                | (InProgress, Harvested)
                | (InProgress, Cancelled)
                | (Harvested, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SeasonStatus::Completed | SeasonStatus::Cancelled)
    }
}

impl std::fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_happy_path() {
        assert!(SeasonStatus::Planned.can_transition_to(SeasonStatus::InProgress));
        assert!(SeasonStatus::InProgress.can_transition_to(SeasonStatus::Harvested));
        assert!(SeasonStatus::Harvested.can_transition_to(SeasonStatus::Completed));
    }

    #[test]
    fn test_season_cancellation() {
        assert!(SeasonStatus::Planned.can_transition_to(SeasonStatus::Cancelled));
        assert!(SeasonStatus::InProgress.can_transition_to(SeasonStatus::Cancelled));
        assert!(!SeasonStatus::Harvested.can_transition_to(SeasonStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for next in [
            SeasonStatus::Planned,
            SeasonStatus::InProgress,
            SeasonStatus::Harvested,
            SeasonStatus::Completed,
            SeasonStatus::Cancelled,
        ] {
            assert!(!SeasonStatus::Completed.can_transition_to(next));
            assert!(!SeasonStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_skipping_stages() {
        assert!(!SeasonStatus::Planned.can_transition_to(SeasonStatus::Harvested));
        assert!(!SeasonStatus::Planned.can_transition_to(SeasonStatus::Completed));
        assert!(!SeasonStatus::InProgress.can_transition_to(SeasonStatus::Completed));
    }
}
