//! A = 1000 visitors / 50 conversions (5.0%), B = 1000 / 75 (7.5%).
//!
//! GREEN when:
//! - uplift is +50%
//! - confidence equals the canonical pooled two-proportion z-test value
//!   (two-tailed), and is above 80.

use gos_stats::{
    compute_confidence, compute_uplift, normal_cdf, ComparisonPair, VariantObservation,
};

#[test]
fn end_to_end_matches_canonical_formula() {
    let a = VariantObservation::new(1_000, 50);
    let b = VariantObservation::new(1_000, 75);

    let uplift = compute_uplift(a.conversion_rate(), b.conversion_rate());
    assert!((uplift - 50.0).abs() < 1e-9, "uplift was {uplift}");

    // Canonical formula, written out independently.
    let p = (50.0 + 75.0) / (1_000.0 + 1_000.0);
    let se = (p * (1.0 - p) * (1.0 / 1_000.0 + 1.0 / 1_000.0_f64)).sqrt();
    let z: f64 = (0.075 - 0.05) / se;
    let expected = (2.0 * normal_cdf(z.abs()) - 1.0) * 100.0;

    let confidence = compute_confidence(1_000, 50, 1_000, 75);
    assert!(
        (confidence - expected).abs() < 1e-6,
        "confidence {confidence} vs canonical {expected}"
    );
    assert!(confidence > 80.0);

    // z ≈ 2.309 => two-tailed ≈ 97.9%.
    assert!((confidence - 97.9).abs() < 0.1, "got {confidence}");

    let pair = ComparisonPair::new(a, b);
    assert_eq!(pair.confidence(), confidence);
    assert!((pair.uplift() - 50.0).abs() < 1e-9);
}
