//! Tests for partner matching
//!
//! Verifies the weighted scoring components, the score threshold, and the
//! ranking behavior of suggestion lists.

use proptest::prelude::*;
use uuid::Uuid;

use shared::matching::{
    haversine_km, rank_candidates, score_candidate, MatchCandidate, MatchCriteria, MAX_RESULTS,
    MAX_SCORE, SCORE_THRESHOLD, WEIGHT_CERTIFICATION, WEIGHT_ESG, WEIGHT_PRODUCT_TYPE,
    WEIGHT_PROXIMITY, WEIGHT_QUALITY,
};
use shared::types::GeoPoint;

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

// ============================================================================
// Component Weight Tests
// ============================================================================

mod component_weights {
    use super::*;

    #[test]
    fn weights_sum_to_max_score() {
        let total = WEIGHT_PRODUCT_TYPE
            + WEIGHT_ESG
            + WEIGHT_CERTIFICATION
            + WEIGHT_PROXIMITY
            + WEIGHT_QUALITY;
        assert_eq!(total, MAX_SCORE);
    }

    #[test]
    fn product_type_matching_is_case_insensitive() {
        let criteria = MatchCriteria {
            product_types: strings(&["COFFEE"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.product_types = strings(&["coffee"]);

        let m = score_candidate(&criteria, &c);
        assert_eq!(m.components.product_type, WEIGHT_PRODUCT_TYPE);
    }

    #[test]
    fn certification_matches_by_containment_not_equality() {
        let criteria = MatchCriteria {
            certifications: strings(&["organic"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.certifications = strings(&["EU Organic Certification 2024"]);

        let m = score_candidate(&criteria, &c);
        assert_eq!(m.components.certification, WEIGHT_CERTIFICATION);
    }

    #[test]
    fn quality_standard_component_is_ten_points_max() {
        let criteria = MatchCriteria {
            quality_standards: strings(&["VietGAP", "GlobalGAP"]),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.quality_standards = strings(&["VietGAP"]);

        let m = score_candidate(&criteria, &c);
        assert!((m.components.quality - WEIGHT_QUALITY / 2.0).abs() < 1e-9);
    }

    #[test]
    fn esg_below_requested_minimum_earns_nothing() {
        let criteria = MatchCriteria {
            min_esg_score: Some(75.0),
            ..Default::default()
        };
        let mut c = candidate("farm");
        c.esg_score = Some(74.9);

        assert_eq!(score_candidate(&criteria, &c).components.esg, 0.0);
    }

    #[test]
    fn proximity_requires_both_locations_and_a_cutoff() {
        let here = GeoPoint::new(10.8231, 106.6297);

        // No candidate location
        let criteria = MatchCriteria {
            location: Some(here),
            max_distance_km: Some(50.0),
            ..Default::default()
        };
        assert_eq!(
            score_candidate(&criteria, &candidate("nowhere")).components.proximity,
            0.0
        );

        // No cutoff
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
    fn empty_criteria_scores_only_esg() {
        let mut c = candidate("farm");
        c.esg_score = Some(80.0);
        c.product_types = strings(&["coffee"]);
        c.certifications = strings(&["organic"]);

        let m = score_candidate(&MatchCriteria::default(), &c);
        assert!((m.score - 0.8 * WEIGHT_ESG).abs() < 1e-9);
    }
}

// ============================================================================
// Ranking Tests
// ============================================================================

mod ranking {
    use super::*;

    #[test]
    fn threshold_is_strictly_greater_than() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            ..Default::default()
        };
        let mut exact = candidate("exact");
        exact.product_types = strings(&["coffee"]);

        let m = score_candidate(&criteria, &exact);
        assert_eq!(m.score, SCORE_THRESHOLD);
        assert!(rank_candidates(&criteria, &[exact]).is_empty());
    }

    #[test]
    fn results_are_sorted_and_capped() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            ..Default::default()
        };
        let mut pool = Vec::new();
        for i in 0..25 {
            let mut c = candidate(&format!("farm-{}", i));
            c.product_types = strings(&["coffee"]);
            c.esg_score = Some(40.0 + (i % 20) as f64);
            pool.push(c);
        }

        let ranked = rank_candidates(&criteria, &pool);
        assert!(ranked.len() <= MAX_RESULTS);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn equal_scores_preserve_input_order() {
        let criteria = MatchCriteria {
            product_types: strings(&["rice"]),
            ..Default::default()
        };
        let names = ["a", "b", "c"];
        let pool: Vec<MatchCandidate> = names
            .iter()
            .map(|n| {
                let mut c = candidate(n);
                c.product_types = strings(&["rice"]);
                c.esg_score = Some(55.0);
                c
            })
            .collect();

        let ranked = rank_candidates(&criteria, &pool);
        let got: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn candidate_with_no_data_is_filtered_not_an_error() {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            min_esg_score: Some(50.0),
            certifications: strings(&["organic"]),
            quality_standards: strings(&["vietgap"]),
            max_distance_km: Some(100.0),
            location: Some(GeoPoint::new(10.0, 105.0)),
        };
        let bare = candidate("bare");
        assert!(rank_candidates(&criteria, &[bare]).is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Scores always land inside [0, 100]
    #[test]
    fn score_stays_in_range(
        esg in proptest::option::of(0.0f64..=100.0),
        lat in -60.0f64..=60.0,
        lng in -170.0f64..=170.0,
        max_km in 1.0f64..=500.0,
    ) {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee", "rice"]),
            min_esg_score: Some(40.0),
            certifications: strings(&["organic"]),
            quality_standards: strings(&["vietgap"]),
            max_distance_km: Some(max_km),
            location: Some(GeoPoint::new(10.0, 105.0)),
        };
        let mut c = candidate("farm");
        c.product_types = strings(&["coffee", "rice"]);
        c.certifications = strings(&["organic"]);
        c.quality_standards = strings(&["vietgap"]);
        c.location = Some(GeoPoint::new(lat, lng));
        c.esg_score = esg;

        let m = score_candidate(&criteria, &c);
        prop_assert!(m.score >= 0.0);
        prop_assert!(m.score <= MAX_SCORE);
    }

    /// A higher ESG score never lowers the total
    #[test]
    fn esg_is_monotonic(lo in 0.0f64..=100.0, delta in 0.0f64..=50.0) {
        let hi = (lo + delta).min(100.0);
        let criteria = MatchCriteria::default();

        let mut a = candidate("low");
        a.esg_score = Some(lo);
        let mut b = candidate("high");
        b.esg_score = Some(hi);

        let ma = score_candidate(&criteria, &a);
        let mb = score_candidate(&criteria, &b);
        prop_assert!(mb.score >= ma.score - 1e-9);
    }

    /// Within the cutoff, a nearer candidate never scores lower on proximity
    #[test]
    fn proximity_decays_with_distance(d1 in 0.0f64..=0.4, d2 in 0.0f64..=0.4) {
        let here = GeoPoint::new(10.0, 105.0);
        let criteria = MatchCriteria {
            location: Some(here),
            max_distance_km: Some(100.0),
            ..Default::default()
        };

        // Offsets in degrees latitude; ~111 km per degree keeps both inside
        let (near_d, far_d) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        let mut near = candidate("near");
        near.location = Some(GeoPoint::new(10.0 + near_d, 105.0));
        let mut far = candidate("far");
        far.location = Some(GeoPoint::new(10.0 + far_d, 105.0));

        let mn = score_candidate(&criteria, &near);
        let mf = score_candidate(&criteria, &far);
        prop_assert!(mn.components.proximity >= mf.components.proximity - 1e-9);
    }

    /// Haversine is symmetric and non-negative
    #[test]
    fn haversine_symmetry(
        lat1 in -80.0f64..=80.0, lng1 in -170.0f64..=170.0,
        lat2 in -80.0f64..=80.0, lng2 in -170.0f64..=170.0,
    ) {
        let a = GeoPoint::new(lat1, lng1);
        let b = GeoPoint::new(lat2, lng2);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    /// Ranking never returns more than the cap and never below the threshold
    #[test]
    fn ranking_invariants(count in 0usize..40, base_esg in 0.0f64..=100.0) {
        let criteria = MatchCriteria {
            product_types: strings(&["coffee"]),
            ..Default::default()
        };
        let pool: Vec<MatchCandidate> = (0..count)
            .map(|i| {
                let mut c = candidate(&format!("farm-{}", i));
                c.product_types = strings(&["coffee"]);
                c.esg_score = Some((base_esg + i as f64) % 100.0);
                c
            })
            .collect();

        let ranked = rank_candidates(&criteria, &pool);
        prop_assert!(ranked.len() <= MAX_RESULTS);
        for m in &ranked {
            prop_assert!(m.score > SCORE_THRESHOLD);
        }
    }
}
