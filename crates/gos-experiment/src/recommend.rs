use crate::types::{Recommendation, RecommendationConfig, RecommendationKind};

/// Rates closer than this (in the caller's unit) count as equal.
const RATE_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arm {
    A,
    B,
}

impl Arm {
    fn label(self) -> &'static str {
        match self {
            Arm::A => "A",
            Arm::B => "B",
        }
    }
}

/// Recommendation with the default 80/95 thresholds.
pub fn get_recommendation(confidence: f64, rate_a: f64, rate_b: f64) -> Recommendation {
    recommend(&RecommendationConfig::default(), confidence, rate_a, rate_b)
}

/// Decision table, first match wins:
/// 1. confidence < `inconclusive_below` => Inconclusive (+ sample-size hint)
/// 2. rates effectively equal           => Inconclusive
/// 3. confidence >= `ship_at`           => ShipB / ShipA (whichever leads)
/// 4. otherwise                         => KeepRunning (leader named in message)
///
/// Total: every input, including NaN, maps to one of the four kinds.
pub fn recommend(
    config: &RecommendationConfig,
    confidence: f64,
    rate_a: f64,
    rate_b: f64,
) -> Recommendation {
    let confidence = if confidence.is_finite() {
        confidence.clamp(0.0, 100.0)
    } else {
        0.0
    };

    if confidence < config.inconclusive_below {
        let needed = suggested_sample_size(config, confidence);
        return Recommendation {
            kind: RecommendationKind::Inconclusive,
            message: format!(
                "Not enough evidence yet ({confidence:.1}% confidence). Keep the test running; \
                 about {needed} more visitors are needed to approach {:.0}% confidence.",
                config.ship_at
            ),
            suggested_sample_size: Some(needed),
        };
    }

    let Some(leader) = leading_arm(rate_a, rate_b) else {
        return Recommendation {
            kind: RecommendationKind::Inconclusive,
            message: format!(
                "Both variants convert at the same rate ({rate_a:.2}%). There is no winner to ship."
            ),
            suggested_sample_size: None,
        };
    };

    let (lead_rate, trail_rate) = match leader {
        Arm::A => (rate_a, rate_b),
        Arm::B => (rate_b, rate_a),
    };

    if confidence >= config.ship_at {
        let kind = match leader {
            Arm::A => RecommendationKind::ShipA,
            Arm::B => RecommendationKind::ShipB,
        };
        return Recommendation {
            kind,
            message: format!(
                "Variant {} is the statistically significant winner: {lead_rate:.2}% vs \
                 {trail_rate:.2}% at {confidence:.1}% confidence.",
                leader.label()
            ),
            suggested_sample_size: None,
        };
    }

    Recommendation {
        kind: RecommendationKind::KeepRunning,
        message: format!(
            "Variant {} leads ({lead_rate:.2}% vs {trail_rate:.2}%) with {confidence:.1}% \
             confidence. Promising, but not yet significant at {:.0}%.",
            leader.label(),
            config.ship_at
        ),
        suggested_sample_size: None,
    }
}

/// UX hint only: extra visitors scale linearly with the confidence gap to
/// `ship_at`. Not a power calculation (see `gos_stats::required_sample_size`).
/// An inverse of the gap would explode near the target, so the hint shrinks
/// to 0 as confidence approaches `ship_at` instead.
pub fn suggested_sample_size(config: &RecommendationConfig, confidence: f64) -> u64 {
    let gap = (config.ship_at - confidence).max(0.0);
    let n = (gap * config.visitors_per_confidence_point).round();
    if n.is_finite() && n > 0.0 {
        n as u64
    } else {
        0
    }
}

fn leading_arm(rate_a: f64, rate_b: f64) -> Option<Arm> {
    let diff = rate_b - rate_a;
    // NaN fails both comparisons and lands on None.
    if diff > RATE_EPSILON {
        Some(Arm::B)
    } else if diff < -RATE_EPSILON {
        Some(Arm::A)
    } else {
        None
    }
}
