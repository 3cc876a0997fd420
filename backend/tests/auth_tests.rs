//! Authentication and authorization tests
//!
//! Property-based and unit tests for account validation rules, role
//! permissions, and Vietnam compliance validations.

use proptest::prelude::*;

use shared::models::UserRole;
use shared::validation::{
    validate_email, validate_password, validate_vietgap_certificate, validate_vietnam_province,
    validate_vietnamese_phone,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net|com\\.vn)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate valid Vietnamese phone numbers
fn vietnamese_phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Standard Vietnamese mobile: 0XXXXXXXXX
        "0[35789][0-9]{8}",
        // With dashes
        "0[35789][0-9]-[0-9]{3}-[0-9]{4}",
        // International format with country code
        "\\+84[35789][0-9]{8}",
    ]
}

/// Generate any of the four platform roles
fn role_strategy() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Farmer),
        Just(UserRole::Business),
        Just(UserRole::Consumer),
        Just(UserRole::EsgExpert),
    ]
}

// ============================================================================
// Role Permission Tests
// ============================================================================

mod roles {
    use super::*;

    #[test]
    fn only_buyers_place_orders() {
        assert!(UserRole::Business.can_place_orders());
        assert!(UserRole::Consumer.can_place_orders());
        assert!(!UserRole::Farmer.can_place_orders());
        assert!(!UserRole::EsgExpert.can_place_orders());
    }

    #[test]
    fn only_farmers_produce() {
        assert!(UserRole::Farmer.is_producer());
        assert!(!UserRole::Business.is_producer());
        assert!(!UserRole::Consumer.is_producer());
        assert!(!UserRole::EsgExpert.is_producer());
    }

    #[test]
    fn unknown_role_strings_are_rejected() {
        assert!(UserRole::parse("admin").is_none());
        assert!(UserRole::parse("").is_none());
        assert!(UserRole::parse("FARMER").is_none());
    }
}

// ============================================================================
// Vietnam Compliance Tests
// ============================================================================

mod vietnam_compliance {
    use super::*;

    #[test]
    fn recognizes_coffee_growing_provinces() {
        assert!(validate_vietnam_province("Dak Lak").is_ok());
        assert!(validate_vietnam_province("Lam Dong").is_ok());
        assert!(validate_vietnam_province("Gia Lai").is_ok());
    }

    #[test]
    fn rejects_foreign_regions() {
        assert!(validate_vietnam_province("Bangkok").is_err());
        assert!(validate_vietnam_province("").is_err());
    }

    #[test]
    fn vietgap_certificate_format() {
        assert!(validate_vietgap_certificate("VietGAP-2024-00042").is_ok());
        assert!(validate_vietgap_certificate("VietGAP-2024-42").is_err());
        assert!(validate_vietgap_certificate("GlobalGAP-2024-00042").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Generated well-formed emails always pass validation
    #[test]
    fn valid_emails_accepted(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    /// Passwords of 8+ characters always pass; shorter ones never do
    #[test]
    fn password_length_rule(password in "[a-zA-Z0-9]{0,20}") {
        let result = validate_password(&password);
        if password.len() >= 8 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Generated Vietnamese phone formats always pass validation
    #[test]
    fn valid_phones_accepted(phone in vietnamese_phone_strategy()) {
        prop_assert!(validate_vietnamese_phone(&phone).is_ok());
    }

    /// Role strings survive a round trip through parse/as_str
    #[test]
    fn role_round_trip(role in role_strategy()) {
        prop_assert_eq!(UserRole::parse(role.as_str()), Some(role));
    }
}
