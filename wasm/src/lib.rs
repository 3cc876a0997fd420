//! WebAssembly module for the AgroConnect marketplace
//!
//! Provides client-side computation for:
//! - Partner match scoring and ranking
//! - Traceability fingerprint verification
//! - Offline data validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::matching::*;
pub use shared::models::*;
pub use shared::trace::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Score a single partner candidate against match criteria
///
/// Both arguments are JSON; returns the full match (score, components,
/// reasons) as JSON.
#[wasm_bindgen]
pub fn score_partner(criteria_json: &str, candidate_json: &str) -> Result<String, JsValue> {
    let criteria: MatchCriteria = serde_json::from_str(criteria_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid criteria JSON: {}", e)))?;
    let candidate: MatchCandidate = serde_json::from_str(candidate_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidate JSON: {}", e)))?;

    let result = score_candidate(&criteria, &candidate);
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rank a JSON array of candidates; returns the filtered top matches as JSON
#[wasm_bindgen]
pub fn rank_partners(criteria_json: &str, candidates_json: &str) -> Result<String, JsValue> {
    let criteria: MatchCriteria = serde_json::from_str(criteria_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid criteria JSON: {}", e)))?;
    let candidates: Vec<MatchCandidate> = serde_json::from_str(candidates_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidates JSON: {}", e)))?;

    let ranked = rank_candidates(&criteria, &candidates);
    serde_json::to_string(&ranked).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Great-circle distance between two coordinates in kilometers
#[wasm_bindgen]
pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_km(GeoPoint::new(lat1, lng1), GeoPoint::new(lat2, lng2))
}

/// Compute the traceability fingerprint for product attributes given as JSON
#[wasm_bindgen]
pub fn compute_product_hash(attributes_json: &str) -> Result<String, JsValue> {
    let attrs: TraceAttributes = serde_json::from_str(attributes_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid attributes JSON: {}", e)))?;
    Ok(compute_trace_hash(&attrs))
}

/// Verify product attributes (JSON) against a stored fingerprint
#[wasm_bindgen]
pub fn verify_product_hash(attributes_json: &str, stored_hash: &str) -> Result<bool, JsValue> {
    let attrs: TraceAttributes = serde_json::from_str(attributes_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid attributes JSON: {}", e)))?;
    Ok(verify_trace_hash(&attrs, stored_hash))
}

/// Validate a Vietnamese phone number
#[wasm_bindgen]
pub fn is_valid_vietnamese_phone(phone: &str) -> bool {
    validate_vietnamese_phone(phone).is_ok()
}

/// Validate an email address
#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Validate a latitude/longitude pair
#[wasm_bindgen]
pub fn is_valid_location(latitude: f64, longitude: f64) -> bool {
    validate_coordinates(latitude, longitude).is_ok()
}

/// Validate ESG sub-scores and return the rounded overall score, or -1.0
/// when any sub-score is out of range
#[wasm_bindgen]
pub fn esg_overall_score(environmental: f64, social: f64, governance: f64) -> f64 {
    let scores = EsgScores {
        environmental,
        social,
        governance,
    };
    if scores.is_valid() {
        scores.overall()
    } else {
        -1.0
    }
}

/// Validate a VietGAP certificate number
#[wasm_bindgen]
pub fn is_valid_vietgap_certificate(cert_number: &str) -> bool {
    validate_vietgap_certificate(cert_number).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Hanoi to Ho Chi Minh City, roughly 1150 km
        let d = haversine_distance_km(21.0278, 105.8342, 10.8231, 106.6297);
        assert!((1130.0..1180.0).contains(&d));
    }

    #[test]
    fn test_score_partner_from_json() {
        let criteria = r#"{"product_types": ["coffee"], "min_esg_score": null,
                           "certifications": [], "quality_standards": [],
                           "max_distance_km": null, "location": null}"#;
        let candidate = r#"{"user_id": "11111111-2222-3333-4444-555555555555",
                            "name": "Dak Lak Coffee Farm",
                            "product_types": ["coffee"], "certifications": [],
                            "quality_standards": [], "location": null,
                            "esg_score": 80.0}"#;

        let result = score_partner(criteria, candidate).unwrap();
        let m: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!((m["score"].as_f64().unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_partner_rejects_bad_json() {
        assert!(score_partner("not json", "{}").is_err());
    }

    #[test]
    fn test_product_hash_round_trip() {
        let attrs = r#"{"name": "Robusta", "farmer_id": "11111111-2222-3333-4444-555555555555",
                        "harvest_date": "2024-11-20", "origin": "Dak Lak",
                        "quality_standards": ["VietGAP"], "certifications": [],
                        "created_at": "2024-12-01T08:30:00Z"}"#;
        let hash = compute_product_hash(attrs).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(verify_product_hash(attrs, &hash).unwrap());
        assert!(!verify_product_hash(attrs, "00").unwrap());
    }

    #[test]
    fn test_esg_overall_score() {
        assert_eq!(esg_overall_score(80.0, 70.0, 90.0), 80.0);
        assert_eq!(esg_overall_score(120.0, 70.0, 90.0), -1.0);
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_vietnamese_phone("0912345678"));
        assert!(!is_valid_vietnamese_phone("12345"));
        assert!(is_valid_email("farmer@agroconnect.vn"));
        assert!(is_valid_location(10.8231, 106.6297));
        assert!(!is_valid_location(91.0, 0.0));
        assert!(is_valid_vietgap_certificate("VietGAP-2024-00123"));
    }
}
