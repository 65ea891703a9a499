/// Relative change (percent) of `rate_b` over `rate_a`.
///
/// Both rates must share a unit (percent or proportion). A zero, negative, or
/// non-finite baseline has nothing to compare against and yields 0.
pub fn compute_uplift(rate_a: f64, rate_b: f64) -> f64 {
    if !rate_a.is_finite() || rate_a <= 0.0 {
        return 0.0;
    }
    let uplift = (rate_b - rate_a) / rate_a * 100.0;
    if uplift.is_finite() {
        uplift
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_baseline() {
        assert_eq!(compute_uplift(0.0, 10.0), 0.0);
        assert_eq!(compute_uplift(0.0, 0.0), 0.0);
    }

    #[test]
    fn sign() {
        assert!((compute_uplift(10.0, 20.0) - 100.0).abs() < 1e-12);
        assert!((compute_uplift(20.0, 10.0) + 50.0).abs() < 1e-12);
        assert_eq!(compute_uplift(7.0, 7.0), 0.0);
    }

    #[test]
    fn unit_independent() {
        let pct = compute_uplift(5.0, 7.5);
        let prop = compute_uplift(0.05, 0.075);
        assert!((pct - 50.0).abs() < 1e-9);
        assert!((prop - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_inputs() {
        assert_eq!(compute_uplift(f64::NAN, 1.0), 0.0);
        assert_eq!(compute_uplift(f64::INFINITY, 1.0), 0.0);
        assert_eq!(compute_uplift(1.0, f64::INFINITY), 0.0);
        assert_eq!(compute_uplift(-3.0, 1.0), 0.0);
    }
}
