use crate::normal::normal_quantile;

/// Visitors needed **per variant** to detect a relative lift of
/// `relative_mde` over `baseline_rate` with a two-sided test.
///
/// - `baseline_rate`: control conversion proportion, `0 < p < 1`
/// - `relative_mde`: minimum detectable effect as a fraction of the baseline
///   (0.10 = +10%), must be > 0 and keep the treatment rate below 1
/// - `alpha`: significance level, `0 < alpha < 1`
/// - `power`: `0 < power < 1`
///
/// Returns `None` when any input is out of range.
pub fn required_sample_size(
    baseline_rate: f64,
    relative_mde: f64,
    alpha: f64,
    power: f64,
) -> Option<u64> {
    if !(baseline_rate > 0.0 && baseline_rate < 1.0) {
        return None;
    }
    if !(relative_mde > 0.0) || !relative_mde.is_finite() {
        return None;
    }

    let p1 = baseline_rate;
    let p2 = p1 * (1.0 + relative_mde);
    if p2 >= 1.0 {
        return None;
    }

    let z_alpha = normal_quantile(1.0 - alpha / 2.0)?;
    let z_beta = normal_quantile(power)?;

    let p_bar = (p1 + p2) / 2.0;
    let null_term = z_alpha * (2.0 * p_bar * (1.0 - p_bar)).sqrt();
    let alt_term = z_beta * (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();
    let delta = p2 - p1;

    let n = (null_term + alt_term).powi(2) / (delta * delta);
    if !n.is_finite() || n <= 0.0 {
        return None;
    }

    Some(n.ceil() as u64)
}
