//! Single-shot statistics commands: confidence, uplift, recommend, sample-size.

use anyhow::{bail, Result};
use gos_config::UnusedKeyPolicy;
use gos_stats::{compute_confidence, compute_uplift, required_sample_size, two_proportion_z_test};

use super::load_config;

pub fn confidence(
    visitors_a: u64,
    conversions_a: u64,
    visitors_b: u64,
    conversions_b: u64,
) -> Result<()> {
    let c = compute_confidence(visitors_a, conversions_a, visitors_b, conversions_b);
    println!("confidence={c:.4}");
    match two_proportion_z_test(visitors_a, conversions_a, visitors_b, conversions_b) {
        Some(t) => {
            println!("pooled={:.6}", t.pooled);
            println!("standard_error={:.6}", t.standard_error);
            println!("z={:.6}", t.z);
        }
        None => println!("degenerate=true"),
    }
    Ok(())
}

pub fn uplift(rate_a: f64, rate_b: f64) -> Result<()> {
    println!("uplift={:.4}", compute_uplift(rate_a, rate_b));
    Ok(())
}

pub fn recommend(
    confidence: f64,
    rate_a: f64,
    rate_b: f64,
    config_paths: &[String],
) -> Result<()> {
    let cfg = load_config(config_paths, UnusedKeyPolicy::Warn)?;
    let r = gos_experiment::recommend(&cfg.recommendation, confidence, rate_a, rate_b);
    println!("kind={}", r.kind);
    println!("message={}", r.message);
    if let Some(n) = r.suggested_sample_size {
        println!("suggested_sample_size={n}");
    }
    if let Some(hash) = cfg.config_hash() {
        println!("config_hash={hash}");
    }
    Ok(())
}

pub fn sample_size(baseline_rate: f64, mde: f64, alpha: f64, power: f64) -> Result<()> {
    let Some(n) = required_sample_size(baseline_rate, mde, alpha, power) else {
        bail!(
            "no sample size for baseline_rate={baseline_rate} mde={mde} alpha={alpha} power={power}: \
             expected 0<baseline<1, mde>0 with baseline*(1+mde)<1, 0<alpha<1, 0<power<1"
        );
    };
    println!("per_variant={n}");
    println!("total={}", n.saturating_mul(2));
    Ok(())
}
