//! Standard normal distribution helpers.
//!
//! Closed-form approximations only; no table lookups and no external crates.

/// Error function, Abramowitz & Stegun 7.1.26. Max absolute error 1.5e-7.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    if x.is_nan() {
        return 0.0;
    }

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let y = 1.0 - poly * (-x * x).exp();

    sign * y
}

/// Standard normal CDF, Φ(x).
pub fn normal_cdf(x: f64) -> f64 {
    (0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))).clamp(0.0, 1.0)
}

/// Inverse standard normal CDF, Abramowitz & Stegun 26.2.23.
/// Max absolute error 4.5e-4.
///
/// Returns `None` unless `0 < p < 1`.
pub fn normal_quantile(p: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }
    if p == 0.5 {
        return Some(0.0);
    }

    const C0: f64 = 2.515_517;
    const C1: f64 = 0.802_853;
    const C2: f64 = 0.010_328;
    const D1: f64 = 1.432_788;
    const D2: f64 = 0.189_269;
    const D3: f64 = 0.001_308;

    // Work in the lower tail, then reflect.
    let tail = if p < 0.5 { p } else { 1.0 - p };
    let t = (-2.0 * tail.ln()).sqrt();
    let x = t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t);

    Some(if p < 0.5 { -x } else { x })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_at_zero_is_half() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn cdf_at_196_is_about_975() {
        let cdf = normal_cdf(1.96);
        assert!((cdf - 0.975).abs() < 1e-4, "cdf(1.96) was {cdf}");
    }

    #[test]
    fn cdf_symmetry() {
        let pos = normal_cdf(1.5);
        let neg = normal_cdf(-1.5);
        assert!((pos + neg - 1.0).abs() < 1e-7);
    }

    #[test]
    fn cdf_tails_stay_in_unit_interval() {
        assert!(normal_cdf(40.0) <= 1.0);
        assert!(normal_cdf(-40.0) >= 0.0);
        assert!(normal_cdf(4.0) > 0.9999);
        assert!(normal_cdf(-4.0) < 0.0001);
    }

    #[test]
    fn erf_is_odd() {
        for x in [0.1, 0.5, 1.0, 2.5] {
            assert!((erf(x) + erf(-x)).abs() < 1e-12);
        }
        assert_eq!(erf(f64::NAN), 0.0);
    }

    #[test]
    fn quantile_known_points() {
        let z975 = normal_quantile(0.975).unwrap();
        assert!((z975 - 1.959_964).abs() < 1e-3, "z975 was {z975}");
        let z80 = normal_quantile(0.8).unwrap();
        assert!((z80 - 0.841_621).abs() < 1e-3, "z80 was {z80}");
        let z025 = normal_quantile(0.025).unwrap();
        assert!((z025 + z975).abs() < 1e-12);
        assert_eq!(normal_quantile(0.5), Some(0.0));
    }

    #[test]
    fn quantile_rejects_out_of_range() {
        assert_eq!(normal_quantile(0.0), None);
        assert_eq!(normal_quantile(1.0), None);
        assert_eq!(normal_quantile(-0.2), None);
        assert_eq!(normal_quantile(f64::NAN), None);
    }
}
