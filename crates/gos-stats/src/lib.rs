//! gos-stats
//!
//! A/B experiment statistics for the CRO module:
//! - Confidence estimation (two-proportion z-test, two-tailed)
//! - Relative uplift between conversion rates
//! - Power-analysis sample size per variant
//!
//! Deterministic, pure logic. No IO, no time, no logging. Every function is
//! total: degenerate inputs resolve to 0 (or `None`) instead of NaN, infinity,
//! or a panic.

mod confidence;
mod normal;
mod sample_size;
mod types;
mod uplift;

pub use confidence::{compute_confidence, two_proportion_z_test, ZTest};
pub use normal::{erf, normal_cdf, normal_quantile};
pub use sample_size::required_sample_size;
pub use types::{ComparisonPair, VariantObservation};
pub use uplift::compute_uplift;

/// Upper bound of every confidence value (percent).
pub const MAX_CONFIDENCE: f64 = 100.0;
