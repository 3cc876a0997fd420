//! User account model and roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Language;

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub preferred_language: Language,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roles a user can hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Farmer,
    Business,
    Consumer,
    EsgExpert,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Farmer => "farmer",
            UserRole::Business => "business",
            UserRole::Consumer => "consumer",
            UserRole::EsgExpert => "esg_expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "farmer" => Some(UserRole::Farmer),
            "business" => Some(UserRole::Business),
            "consumer" => Some(UserRole::Consumer),
            "esg_expert" => Some(UserRole::EsgExpert),
            _ => None,
        }
    }

    /// Roles that can act as a buyer when placing orders
    pub fn can_place_orders(&self) -> bool {
        matches!(self, UserRole::Business | UserRole::Consumer)
    }

    /// Roles that can list products and manage seasons
    pub fn is_producer(&self) -> bool {
        matches!(self, UserRole::Farmer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Farmer,
            UserRole::Business,
            UserRole::Consumer,
            UserRole::EsgExpert,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("admin"), None);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Business.can_place_orders());
        assert!(UserRole::Consumer.can_place_orders());
        assert!(!UserRole::Farmer.can_place_orders());
        assert!(UserRole::Farmer.is_producer());
        assert!(!UserRole::EsgExpert.is_producer());
    }
}
