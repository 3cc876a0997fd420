//! Product traceability fingerprint
//!
//! A product's static attributes are serialized to JSON and hashed with
//! SHA-256. The digest is stored next to the product and recomputed at
//! verification time; verification succeeds iff both digests are equal. This
//! is a pure data-integrity check, not a ledger.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// The static product attributes covered by the fingerprint
///
/// Field order is fixed by the struct definition, which makes the JSON
/// serialization (and therefore the digest) deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceAttributes {
    pub name: String,
    pub farmer_id: Uuid,
    pub harvest_date: Option<NaiveDate>,
    pub origin: Option<String>,
    pub quality_standards: Vec<String>,
    pub certifications: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// SHA-256 hex digest of the JSON-serialized attributes
pub fn compute_trace_hash(attrs: &TraceAttributes) -> String {
    // Serialization of a plain struct with no maps cannot fail
    let payload = serde_json::to_string(attrs).unwrap_or_default();
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}

/// Recompute the digest from current attributes and compare with the stored one
pub fn verify_trace_hash(attrs: &TraceAttributes, stored_hash: &str) -> bool {
    compute_trace_hash(attrs) == stored_hash
}

/// Derive the public traceability code for a product
///
/// Format: `AGC-<year>-<first 8 hex of the trace hash, uppercased>`
pub fn traceability_code(created_at: DateTime<Utc>, trace_hash: &str) -> String {
    use chrono::Datelike;
    let prefix: String = trace_hash.chars().take(8).collect();
    format!("AGC-{}-{}", created_at.year(), prefix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> TraceAttributes {
        TraceAttributes {
            name: "Robusta coffee".to_string(),
            farmer_id: Uuid::parse_str("11111111-2222-3333-4444-555555555555").unwrap(),
            harvest_date: Some(NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()),
            origin: Some("Buon Ma Thuot, Dak Lak".to_string()),
            quality_standards: vec!["VietGAP".to_string()],
            certifications: vec!["Organic".to_string(), "Fairtrade".to_string()],
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(compute_trace_hash(&sample()), compute_trace_hash(&sample()));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = compute_trace_hash(&sample());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verification_round_trip() {
        let attrs = sample();
        let stored = compute_trace_hash(&attrs);
        assert!(verify_trace_hash(&attrs, &stored));
    }

    #[test]
    fn test_any_field_change_breaks_verification() {
        let original = sample();
        let stored = compute_trace_hash(&original);

        let mut changed = original.clone();
        changed.name = "Arabica coffee".to_string();
        assert!(!verify_trace_hash(&changed, &stored));

        let mut changed = original.clone();
        changed.harvest_date = Some(NaiveDate::from_ymd_opt(2024, 11, 21).unwrap());
        assert!(!verify_trace_hash(&changed, &stored));

        let mut changed = original.clone();
        changed.origin = None;
        assert!(!verify_trace_hash(&changed, &stored));

        let mut changed = original.clone();
        changed.certifications.pop();
        assert!(!verify_trace_hash(&changed, &stored));
    }

    #[test]
    fn test_traceability_code_format() {
        let attrs = sample();
        let hash = compute_trace_hash(&attrs);
        let code = traceability_code(attrs.created_at, &hash);

        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "AGC");
        assert_eq!(parts[1], "2024");
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
