//! Traceability fingerprint tests
//!
//! Covers hash determinism, tamper detection, and the public code format
//! encoded into QR payloads.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use shared::trace::{compute_trace_hash, traceability_code, verify_trace_hash, TraceAttributes};

fn attrs(name: &str) -> TraceAttributes {
    TraceAttributes {
        name: name.to_string(),
        farmer_id: Uuid::parse_str("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee").unwrap(),
        harvest_date: Some(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()),
        origin: Some("Lam Dong".to_string()),
        quality_standards: vec!["VietGAP".to_string()],
        certifications: vec!["Organic".to_string()],
        created_at: Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod fingerprint {
    use super::*;

    #[test]
    fn same_attributes_same_hash() {
        assert_eq!(compute_trace_hash(&attrs("Tea")), compute_trace_hash(&attrs("Tea")));
    }

    #[test]
    fn hash_is_64_hex_characters() {
        let hash = compute_trace_hash(&attrs("Tea"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verification_accepts_untouched_record() {
        let a = attrs("Dragon fruit");
        let stored = compute_trace_hash(&a);
        assert!(verify_trace_hash(&a, &stored));
    }

    #[test]
    fn renaming_the_product_breaks_verification() {
        let original = attrs("Robusta");
        let stored = compute_trace_hash(&original);
        assert!(!verify_trace_hash(&attrs("Arabica"), &stored));
    }

    #[test]
    fn clearing_an_optional_field_breaks_verification() {
        let original = attrs("Robusta");
        let stored = compute_trace_hash(&original);

        let mut tampered = original.clone();
        tampered.harvest_date = None;
        assert!(!verify_trace_hash(&tampered, &stored));
    }

    #[test]
    fn certification_order_matters() {
        let mut a = attrs("Robusta");
        a.certifications = vec!["Organic".to_string(), "Fairtrade".to_string()];
        let mut b = attrs("Robusta");
        b.certifications = vec!["Fairtrade".to_string(), "Organic".to_string()];
        assert_ne!(compute_trace_hash(&a), compute_trace_hash(&b));
    }
}

// ============================================================================
// Traceability Code Tests
// ============================================================================

mod code_format {
    use super::*;

    #[test]
    fn code_carries_prefix_year_and_hash_fragment() {
        let a = attrs("Robusta");
        let hash = compute_trace_hash(&a);
        let code = traceability_code(a.created_at, &hash);

        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "AGC");
        assert_eq!(parts[1], "2024");
        assert_eq!(parts[2], hash[..8].to_uppercase());
    }

    #[test]
    fn code_year_follows_creation_time() {
        let mut a = attrs("Robusta");
        a.created_at = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let code = traceability_code(a.created_at, &compute_trace_hash(&a));
        assert!(code.starts_with("AGC-2026-"));
    }

    #[test]
    fn qr_url_embeds_the_code() {
        let code = "AGC-2024-1A2B3C4D";
        let url = format!("{}/trace/{}", "https://agroconnect.vn", code);
        assert_eq!(url, "https://agroconnect.vn/trace/AGC-2024-1A2B3C4D");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The fingerprint is a pure function of the attributes
    #[test]
    fn hash_purity(name in "[a-zA-Z ]{1,40}", origin in proptest::option::of("[a-zA-Z ]{1,30}")) {
        let mut a = attrs(&name);
        a.origin = origin;
        prop_assert_eq!(compute_trace_hash(&a), compute_trace_hash(&a.clone()));
    }

    /// Two products differing in name never share a fingerprint
    #[test]
    fn distinct_names_distinct_hashes(name in "[a-z]{1,20}") {
        let base = attrs("fixed-name");
        let other = attrs(&name);
        if base.name != other.name {
            prop_assert_ne!(compute_trace_hash(&base), compute_trace_hash(&other));
        }
    }

    /// Codes always match the AGC-YYYY-XXXXXXXX shape
    #[test]
    fn code_shape(year in 2020i32..2100, name in "[a-z]{1,20}") {
        let mut a = attrs(&name);
        a.created_at = Utc.with_ymd_and_hms(year, 6, 15, 12, 0, 0).unwrap();
        let code = traceability_code(a.created_at, &compute_trace_hash(&a));

        let parts: Vec<&str> = code.split('-').collect();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[0], "AGC");
        prop_assert_eq!(parts[1], year.to_string());
        prop_assert_eq!(parts[2].len(), 8);
        prop_assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
