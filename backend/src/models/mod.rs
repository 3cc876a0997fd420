//! Database models for the AgroConnect backend
//!
//! Re-exports models from the shared crate and adds row-mapping helpers for
//! SQLite, where string arrays are stored as JSON text columns.

pub use shared::models::*;

/// Parse a JSON text column into a string list; NULL or bad data become empty
pub fn parse_string_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Serialize a string list for storage in a JSON text column
pub fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_round_trip() {
        let items = vec!["Organic".to_string(), "VietGAP".to_string()];
        let json = to_json_list(&items);
        assert_eq!(parse_string_list(Some(&json)), items);
    }

    #[test]
    fn test_string_list_tolerates_missing_and_garbage() {
        assert!(parse_string_list(None).is_empty());
        assert!(parse_string_list(Some("not json")).is_empty());
    }
}
