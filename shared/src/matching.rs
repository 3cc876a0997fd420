//! Partner matching score
//!
//! Ranks potential business/farmer counterparts by a weighted sum of
//! independent heuristics: product-type overlap, ESG score, certification
//! overlap, geographic proximity and quality-standard overlap. Pure functions
//! so the backend and the WASM frontend share one implementation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GeoPoint;

/// Maximum points per component
pub const WEIGHT_PRODUCT_TYPE: f64 = 30.0;
pub const WEIGHT_ESG: f64 = 25.0;
pub const WEIGHT_CERTIFICATION: f64 = 20.0;
pub const WEIGHT_PROXIMITY: f64 = 15.0;
pub const WEIGHT_QUALITY: f64 = 10.0;

/// Candidates scoring at or below this are not returned
pub const SCORE_THRESHOLD: f64 = 30.0;

/// Result list is truncated to this many entries
pub const MAX_RESULTS: usize = 10;

/// Score ceiling
pub const MAX_SCORE: f64 = 100.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Filter criteria declared by the requesting party
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchCriteria {
    /// Product types the requester wants matched
    #[serde(default)]
    pub product_types: Vec<String>,
    /// Candidates below this ESG score earn no ESG points
    pub min_esg_score: Option<f64>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub quality_standards: Vec<String>,
    /// Proximity cutoff; without it the proximity component is skipped
    pub max_distance_km: Option<f64>,
    /// Requester location, needed for the proximity component
    pub location: Option<GeoPoint>,
}

/// A counterpart under consideration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub product_types: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub quality_standards: Vec<String>,
    pub location: Option<GeoPoint>,
    /// Overall score of the latest approved ESG verification
    pub esg_score: Option<f64>,
}

/// Per-component point breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchComponents {
    pub product_type: f64,
    pub esg: f64,
    pub certification: f64,
    pub proximity: f64,
    pub quality: f64,
}

/// Scored candidate with human-readable reasons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerMatch {
    pub user_id: Uuid,
    pub name: String,
    pub score: f64,
    pub components: MatchComponents,
    pub reasons: Vec<String>,
    pub distance_km: Option<f64>,
}

/// Great-circle distance between two coordinate pairs in kilometers
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Fraction of `requested` entries present in `held`, by case-insensitive
/// equality. Returns None when nothing was requested.
fn equality_fraction(requested: &[String], held: &[String]) -> Option<f64> {
    if requested.is_empty() {
        return None;
    }
    let held: Vec<String> = held.iter().map(|s| s.trim().to_lowercase()).collect();
    let matched = requested
        .iter()
        .filter(|r| held.iter().any(|h| *h == r.trim().to_lowercase()))
        .count();
    Some(matched as f64 / requested.len() as f64)
}

/// Fraction of `requested` entries matched in `held` by case-insensitive
/// substring containment. Returns None when nothing was requested.
fn containment_fraction(requested: &[String], held: &[String]) -> Option<f64> {
    if requested.is_empty() {
        return None;
    }
    let held: Vec<String> = held.iter().map(|s| s.trim().to_lowercase()).collect();
    let matched = requested
        .iter()
        .filter(|r| {
            let r = r.trim().to_lowercase();
            !r.is_empty() && held.iter().any(|h| h.contains(&r))
        })
        .count();
    Some(matched as f64 / requested.len() as f64)
}

fn count_from_fraction(fraction: f64, requested: usize) -> usize {
    (fraction * requested as f64).round() as usize
}

/// Score a single candidate against the criteria
///
/// Each component degrades gracefully: missing profile, location or ESG data
/// skips that component rather than raising an error.
pub fn score_candidate(criteria: &MatchCriteria, candidate: &MatchCandidate) -> PartnerMatch {
    let mut components = MatchComponents::default();
    let mut reasons = Vec::new();
    let mut distance_km = None;

    // Product-type overlap, up to 30 points
    if let Some(fraction) = equality_fraction(&criteria.product_types, &candidate.product_types) {
        components.product_type = fraction * WEIGHT_PRODUCT_TYPE;
        if fraction > 0.0 {
            reasons.push(format!(
                "Offers {} of {} requested product types",
                count_from_fraction(fraction, criteria.product_types.len()),
                criteria.product_types.len()
            ));
        }
    }

    // ESG score, up to 25 points, gated on the requested minimum
    if let Some(esg) = candidate.esg_score {
        let meets_minimum = criteria.min_esg_score.map_or(true, |min| esg >= min);
        if meets_minimum {
            components.esg = (esg / 100.0).clamp(0.0, 1.0) * WEIGHT_ESG;
            reasons.push(format!("Verified ESG score of {:.0}/100", esg));
        }
    }

    // Certification overlap, up to 20 points
    if let Some(fraction) = containment_fraction(&criteria.certifications, &candidate.certifications)
    {
        components.certification = fraction * WEIGHT_CERTIFICATION;
        if fraction > 0.0 {
            reasons.push(format!(
                "Holds {} of {} requested certifications",
                count_from_fraction(fraction, criteria.certifications.len()),
                criteria.certifications.len()
            ));
        }
    }

    // Geographic proximity, up to 15 points, gated on the max-distance cutoff
    if let (Some(here), Some(there), Some(max)) =
        (criteria.location, candidate.location, criteria.max_distance_km)
    {
        if max > 0.0 {
            let d = haversine_km(here, there);
            distance_km = Some(d);
            if d <= max {
                components.proximity = (1.0 - d / max) * WEIGHT_PROXIMITY;
                reasons.push(format!("Located {:.1} km away", d));
            }
        }
    }

    // Quality-standard overlap, up to 10 points
    if let Some(fraction) =
        containment_fraction(&criteria.quality_standards, &candidate.quality_standards)
    {
        components.quality = fraction * WEIGHT_QUALITY;
        if fraction > 0.0 {
            reasons.push(format!(
                "Meets {} of {} requested quality standards",
                count_from_fraction(fraction, criteria.quality_standards.len()),
                criteria.quality_standards.len()
            ));
        }
    }

    let raw = components.product_type
        + components.esg
        + components.certification
        + components.proximity
        + components.quality;

    PartnerMatch {
        user_id: candidate.user_id,
        name: candidate.name.clone(),
        score: raw.min(MAX_SCORE),
        components,
        reasons,
        distance_km,
    }
}

/// Score, filter, sort and truncate a candidate list
///
/// Only candidates scoring above [`SCORE_THRESHOLD`] survive; results are
/// sorted descending and cut to [`MAX_RESULTS`]. The sort is stable, so equal
/// scores keep candidate-list order.
pub fn rank_candidates(
    criteria: &MatchCriteria,
    candidates: &[MatchCandidate],
) -> Vec<PartnerMatch> {
    let mut matches: Vec<PartnerMatch> = candidates
        .iter()
        .map(|c| score_candidate(criteria, c))
        .filter(|m| m.score > SCORE_THRESHOLD)
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(MAX_RESULTS);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> MatchCandidate {
        MatchCandidate {
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            product_types: vec![],
            certifications: vec![],
            quality_standards: vec![],
            location: None,
            esg_score: None,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_haversine_hanoi_to_hcmc() {
        let hanoi = GeoPoint::new(21.0278, 105.8342);
        let hcmc = GeoPoint::new(10.8231, 106.6297);
        let d = haversine_km(hanoi, hcmc);
        assert!((1130.0..1180.0).contains(&d), "distance was {}", d);
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = GeoPoint::new(16.0544, 108.2022);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_full_product_type_overlap_scores_thirty() {
        let criteria = MatchCriteria {
            product_types: strings(&["Coffee", "rice"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.product_types = strings(&["coffee", "Rice", "pepper"]);

        let m = score_candidate(&criteria, &c);
        assert_eq!(m.components.product_type, WEIGHT_PRODUCT_TYPE);
        assert_eq!(m.score, WEIGHT_PRODUCT_TYPE);
    }

    #[test]
    fn test_partial_overlap_is_proportional() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee", "rice", "tea", "pepper"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.product_types = strings(&["coffee"]);

        let m = score_candidate(&criteria, &c);
        assert!((m.components.product_type - WEIGHT_PRODUCT_TYPE / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_esg_gated_on_minimum() {
        let criteria = MatchCriteria {
            min_esg_score: Some(70.0),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.esg_score = Some(60.0);
        assert_eq!(score_candidate(&criteria, &c).components.esg, 0.0);

        c.esg_score = Some(80.0);
        let m = score_candidate(&criteria, &c);
        assert!((m.components.esg - 0.8 * WEIGHT_ESG).abs() < 1e-9);
    }

    #[test]
    fn test_missing_esg_is_skipped_not_an_error() {
        let criteria = MatchCriteria {
            min_esg_score: Some(50.0),
            ..Default::default()
        };
        let m = score_candidate(&criteria, &candidate("farm"));
        assert_eq!(m.components.esg, 0.0);
        assert!(m.reasons.is_empty());
    }

    #[test]
    fn test_certification_substring_containment() {
        let criteria = MatchCriteria {
            certifications: strings(&["organic", "GlobalGAP"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.certifications = strings(&["Vietnam Organic Certificate", "VietGAP"]);

        // "organic" is contained in the first entry; "globalgap" is not
        let m = score_candidate(&criteria, &c);
        assert!((m.components.certification - WEIGHT_CERTIFICATION / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_proximity_linear_decay() {
        let here = GeoPoint::new(10.0, 105.0);
        let criteria = MatchCriteria {
            location: Some(here),
            max_distance_km: Some(100.0),
            ..Default::default()
        };

        let mut near = candidate("near");
        near.location = Some(here);
        let m = score_candidate(&criteria, &near);
        assert!((m.components.proximity - WEIGHT_PROXIMITY).abs() < 1e-9);

        let mut far = candidate("far");
        // Roughly 111 km north, beyond the cutoff
        far.location = Some(GeoPoint::new(11.0, 105.0));
        let m = score_candidate(&criteria, &far);
        assert_eq!(m.components.proximity, 0.0);
    }

    #[test]
    fn test_proximity_skipped_without_cutoff() {
        let here = GeoPoint::new(10.0, 105.0);
        let criteria = MatchCriteria {
            location: Some(here),
            max_distance_km: None,
            ..Default::default()
        };
        let mut c = candidate("near");
        c.location = Some(here);
        assert_eq!(score_candidate(&criteria, &c).components.proximity, 0.0);
    }

    #[test]
    fn test_total_capped_at_hundred() {
        let here = GeoPoint::new(10.0, 105.0);
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            min_esg_score: None,
            certifications: strings(&["organic"]),
            quality_standards: strings(&["vietgap"]),
            max_distance_km: Some(100.0),
            location: Some(here),
        };
        let mut c = candidate("perfect");
        c.product_types = strings(&["coffee"]);
        c.certifications = strings(&["organic"]);
        c.quality_standards = strings(&["vietgap"]);
        c.location = Some(here);
        c.esg_score = Some(100.0);

        let m = score_candidate(&criteria, &c);
        assert!(m.score <= MAX_SCORE);
        assert_eq!(m.score, MAX_SCORE);
    }

    #[test]
    fn test_rank_filters_threshold_and_truncates() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            ..Default::default()
        };

        // 30 points exactly: at the threshold, must be dropped
        let mut at_threshold = candidate("edge");
        at_threshold.product_types = strings(&["coffee"]);
        let edge = score_candidate(&criteria, &at_threshold);
        assert_eq!(edge.score, SCORE_THRESHOLD);
        assert!(rank_candidates(&criteria, &[at_threshold.clone()]).is_empty());

        // Above the threshold thanks to the ESG component
        let mut pool = Vec::new();
        for i in 0..15 {
            let mut c = candidate(&format!("farm-{}", i));
            c.product_types = strings(&["coffee"]);
            c.esg_score = Some(50.0 + i as f64);
            pool.push(c);
        }
        let ranked = rank_candidates(&criteria, &pool);
        assert_eq!(ranked.len(), MAX_RESULTS);
        // Sorted descending
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].name, "farm-14");
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            ..Default::default()
        };
        let mut first = candidate("first");
        first.product_types = strings(&["coffee"]);
        first.esg_score = Some(60.0);
        let mut second = candidate("second");
        second.product_types = strings(&["coffee"]);
        second.esg_score = Some(60.0);

        let ranked = rank_candidates(&criteria, &[first, second]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "first");
        assert_eq!(ranked[1].name, "second");
    }
}
