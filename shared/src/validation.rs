//! Validation utilities for the AgroConnect marketplace
//!
//! Includes Vietnam-specific validations for phone numbers and growing
//! regions.

use crate::models::EsgScores;

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a latitude/longitude pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate ESG sub-scores are each within 0-100
pub fn validate_esg_scores(scores: &EsgScores) -> Result<(), &'static str> {
    if !scores.is_valid() {
        return Err("ESG scores must be between 0 and 100");
    }
    Ok(())
}

/// Validate a positive quantity or price
pub fn validate_positive(value: f64) -> Result<(), &'static str> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err("Value must be a positive number")
    }
}

// ============================================================================
// Vietnam-Specific Validations
// ============================================================================

/// Validate Vietnamese phone number format
/// Accepts: 0912345678, 091-234-5678, +84912345678
pub fn validate_vietnamese_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Vietnamese mobile: 10 digits starting with 0 (e.g., 0912345678)
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // International format without leading 0: 9 digits
    if digits.len() == 9 && !digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 11 digits starting with 84
    if digits.len() == 11 && digits.starts_with("84") {
        return Ok(());
    }

    Err("Invalid Vietnamese phone number format")
}

/// Vietnamese provinces with significant agricultural output
pub const VIETNAM_AGRICULTURE_PROVINCES: &[&str] = &[
    "An Giang",
    "Dak Lak",
    "Dak Nong",
    "Gia Lai",
    "Kon Tum",
    "Lam Dong",
    "Son La",
    "Dien Bien",
    "Nghe An",
    "Quang Tri",
    "Binh Phuoc",
    "Dong Nai",
    "Ben Tre",
    "Tien Giang",
    "Dong Thap",
    "Can Tho",
    "Soc Trang",
    "Ca Mau",
];

/// Validate province is a known Vietnamese agricultural region
pub fn validate_vietnam_province(province: &str) -> Result<(), &'static str> {
    let province_lower = province.to_lowercase();
    if VIETNAM_AGRICULTURE_PROVINCES
        .iter()
        .any(|p| p.to_lowercase() == province_lower)
    {
        return Ok(());
    }
    Err("Province is not a recognized Vietnamese agricultural region")
}

/// Validate VietGAP certificate number format
/// Format: VietGAP-YYYY-NNNNN (e.g., VietGAP-2024-00123)
pub fn validate_vietgap_certificate(cert_number: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = cert_number.split('-').collect();

    if parts.len() != 3 {
        return Err("VietGAP certificate must be in format VietGAP-YYYY-NNNNN");
    }
    if parts[0] != "VietGAP" {
        return Err("VietGAP certificate must start with 'VietGAP'");
    }
    if parts[1].len() != 4 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in VietGAP certificate");
    }
    if parts[2].len() != 5 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence number in VietGAP certificate");
    }
    Ok(())
}
