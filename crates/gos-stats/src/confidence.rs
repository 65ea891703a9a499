use crate::normal::normal_cdf;
use crate::MAX_CONFIDENCE;

/// Intermediate values of a two-proportion z-test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZTest {
    /// Pooled conversion proportion under the null hypothesis.
    pub pooled: f64,
    /// Standard error of the difference in proportions.
    pub standard_error: f64,
    /// `(rate_b - rate_a) / standard_error`, proportions.
    pub z: f64,
}

impl ZTest {
    /// Two-tailed confidence (percent) that the arms differ.
    pub fn confidence(&self) -> f64 {
        let p_two_tailed = 2.0 * (1.0 - normal_cdf(self.z.abs()));
        ((1.0 - p_two_tailed) * 100.0).clamp(0.0, MAX_CONFIDENCE)
    }
}

/// Run the pooled two-proportion z-test.
///
/// Returns `None` for every degenerate input:
/// - either arm has zero visitors
/// - both arms have identical conversion rates (exact, on integer counts)
/// - zero or non-finite standard error (e.g. both arms at 0% or 100%)
pub fn two_proportion_z_test(
    visitors_a: u64,
    conversions_a: u64,
    visitors_b: u64,
    conversions_b: u64,
) -> Option<ZTest> {
    if visitors_a == 0 || visitors_b == 0 {
        return None;
    }

    // cA/vA == cB/vB  <=>  cA*vB == cB*vA. u128 cannot overflow for u64 inputs.
    if conversions_a as u128 * visitors_b as u128 == conversions_b as u128 * visitors_a as u128 {
        return None;
    }

    let va = visitors_a as f64;
    let vb = visitors_b as f64;
    let rate_a = conversions_a as f64 / va;
    let rate_b = conversions_b as f64 / vb;

    let pooled = (conversions_a as f64 + conversions_b as f64) / (va + vb);
    let variance = pooled * (1.0 - pooled) * (1.0 / va + 1.0 / vb);
    let standard_error = variance.sqrt();

    if !standard_error.is_finite() || standard_error <= 0.0 {
        return None;
    }

    let z = (rate_b - rate_a) / standard_error;
    if !z.is_finite() {
        return None;
    }

    Some(ZTest {
        pooled,
        standard_error,
        z,
    })
}

/// Confidence (percent, `0..=100`) that variant B's conversion rate differs
/// from variant A's.
///
/// Insufficient or degenerate data yields 0, never an error.
pub fn compute_confidence(
    visitors_a: u64,
    conversions_a: u64,
    visitors_b: u64,
    conversions_b: u64,
) -> f64 {
    two_proportion_z_test(visitors_a, conversions_a, visitors_b, conversions_b)
        .map(|t| t.confidence())
        .unwrap_or(0.0)
}
