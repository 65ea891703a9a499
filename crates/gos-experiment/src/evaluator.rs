use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use gos_stats::{compute_confidence, compute_uplift};
use tracing::{debug, warn};

use crate::recommend::recommend;
use crate::types::{
    ExperimentEvaluation, ExperimentOutcome, ExperimentReport, RecommendationConfig,
    VariantComparison, VariantRow, VariantSummary,
};

/// Stored vs recomputed rate drift (percentage points) worth a warning.
const RATE_DRIFT_WARN_PCT: f64 = 0.01;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Why an experiment could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluateError {
    /// No row flagged `is_control`.
    MissingControl { experiment_id: String },
    /// More than one row flagged `is_control`.
    MultipleControls { experiment_id: String, count: usize },
    /// A control exists but nothing to compare it with.
    NoTreatment { experiment_id: String },
    /// Two rows of one experiment share a variant name.
    DuplicateVariant {
        experiment_id: String,
        variant_name: String,
    },
    /// A row violates `conversions <= visitors`.
    InvalidCounts {
        experiment_id: String,
        variant_name: String,
        visitors: u64,
        conversions: u64,
    },
}

impl std::fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluateError::MissingControl { experiment_id } => {
                write!(f, "experiment {experiment_id}: no control variant")
            }
            EvaluateError::MultipleControls {
                experiment_id,
                count,
            } => write!(
                f,
                "experiment {experiment_id}: {count} variants flagged as control (expected 1)"
            ),
            EvaluateError::NoTreatment { experiment_id } => {
                write!(f, "experiment {experiment_id}: no treatment variant")
            }
            EvaluateError::DuplicateVariant {
                experiment_id,
                variant_name,
            } => write!(
                f,
                "experiment {experiment_id}: variant name '{variant_name}' appears more than once"
            ),
            EvaluateError::InvalidCounts {
                experiment_id,
                variant_name,
                visitors,
                conversions,
            } => write!(
                f,
                "experiment {experiment_id}: variant '{variant_name}' has {conversions} \
                 conversions but only {visitors} visitors"
            ),
        }
    }
}

impl std::error::Error for EvaluateError {}

// ============================================================================
// Public API
// ============================================================================

/// Group rows by `experiment_id`. Deterministic (BTreeMap) ordering; rows keep
/// their input order within a group.
pub fn group_rows(rows: &[VariantRow]) -> BTreeMap<String, Vec<VariantRow>> {
    let mut groups: BTreeMap<String, Vec<VariantRow>> = BTreeMap::new();
    for r in rows {
        groups.entry(r.experiment_id.clone()).or_default().push(r.clone());
    }
    groups
}

/// Compare one treatment row against the control row.
pub fn compare_variants(
    config: &RecommendationConfig,
    control: &VariantRow,
    treatment: &VariantRow,
) -> VariantComparison {
    let a = control.observation();
    let b = treatment.observation();

    let confidence = compute_confidence(a.visitors, a.conversions, b.visitors, b.conversions);
    let rate_a = a.conversion_rate();
    let rate_b = b.conversion_rate();
    let uplift = compute_uplift(rate_a, rate_b);
    let recommendation = recommend(config, confidence, rate_a, rate_b);

    VariantComparison {
        variant: VariantSummary::from(treatment),
        confidence,
        uplift,
        recommendation,
    }
}

/// Evaluate a single experiment: exactly one control, one or more treatments,
/// unique variant names. Every treatment is compared against the control.
pub fn evaluate_experiment(
    config: &RecommendationConfig,
    experiment_id: &str,
    rows: &[VariantRow],
) -> Result<ExperimentEvaluation, EvaluateError> {
    let mut seen = BTreeSet::new();
    for r in rows {
        if !seen.insert(r.variant_name.as_str()) {
            return Err(EvaluateError::DuplicateVariant {
                experiment_id: experiment_id.to_string(),
                variant_name: r.variant_name.clone(),
            });
        }
        if !r.observation().is_consistent() {
            return Err(EvaluateError::InvalidCounts {
                experiment_id: experiment_id.to_string(),
                variant_name: r.variant_name.clone(),
                visitors: r.visitors,
                conversions: r.conversions,
            });
        }
        warn_on_rate_drift(experiment_id, r);
    }

    let controls: Vec<&VariantRow> = rows.iter().filter(|r| r.is_control).collect();
    let control = match controls.as_slice() {
        [] => {
            return Err(EvaluateError::MissingControl {
                experiment_id: experiment_id.to_string(),
            })
        }
        [c] => *c,
        many => {
            return Err(EvaluateError::MultipleControls {
                experiment_id: experiment_id.to_string(),
                count: many.len(),
            })
        }
    };

    let mut comparisons: Vec<VariantComparison> = rows
        .iter()
        .filter(|r| !r.is_control)
        .map(|t| compare_variants(config, control, t))
        .collect();

    if comparisons.is_empty() {
        return Err(EvaluateError::NoTreatment {
            experiment_id: experiment_id.to_string(),
        });
    }

    comparisons.sort_by(|x, y| x.variant.name.cmp(&y.variant.name));

    let leader = comparisons
        .iter()
        .skip(1)
        .fold(&comparisons[0], |best, c| pick_leader(best, c))
        .variant
        .name
        .clone();

    debug!(
        experiment_id,
        treatments = comparisons.len(),
        leader = %leader,
        "experiment evaluated"
    );

    Ok(ExperimentEvaluation {
        experiment_id: experiment_id.to_string(),
        control: VariantSummary::from(control),
        comparisons,
        leader: Some(leader),
    })
}

/// Compare two treatments of the same experiment. Returns the leader by
/// tie-break rules:
/// 1. Better recommendation (ShipB > KeepRunning > Inconclusive > ShipA)
/// 2. Higher confidence
/// 3. Higher treatment conversion rate
/// 4. Lexicographic variant name
pub fn pick_leader<'a>(
    a: &'a VariantComparison,
    b: &'a VariantComparison,
) -> &'a VariantComparison {
    // 1. Recommendation rank
    match a
        .recommendation
        .kind
        .leader_rank()
        .cmp(&b.recommendation.kind.leader_rank())
    {
        std::cmp::Ordering::Greater => return a,
        std::cmp::Ordering::Less => return b,
        std::cmp::Ordering::Equal => {}
    }
    // 2. Higher confidence
    match partial_cmp_f64(a.confidence, b.confidence) {
        std::cmp::Ordering::Greater => return a,
        std::cmp::Ordering::Less => return b,
        std::cmp::Ordering::Equal => {}
    }
    // 3. Higher rate
    match partial_cmp_f64(a.variant.conversion_rate, b.variant.conversion_rate) {
        std::cmp::Ordering::Greater => return a,
        std::cmp::Ordering::Less => return b,
        std::cmp::Ordering::Equal => {}
    }
    // 4. Lexicographic
    if a.variant.name <= b.variant.name {
        a
    } else {
        b
    }
}

/// Evaluate every experiment present in `rows`. Experiments that cannot be
/// evaluated are reported as skipped rather than failing the batch.
pub fn evaluate_all(
    config: &RecommendationConfig,
    rows: &[VariantRow],
) -> Vec<ExperimentOutcome> {
    group_rows(rows)
        .into_iter()
        .map(
            |(experiment_id, group)| match evaluate_experiment(config, &experiment_id, &group) {
                Ok(eval) => ExperimentOutcome::Evaluated(eval),
                Err(e) => {
                    warn!(experiment_id = %experiment_id, reason = %e, "experiment skipped");
                    ExperimentOutcome::Skipped {
                        experiment_id,
                        reason: e.to_string(),
                    }
                }
            },
        )
        .collect()
}

/// Bundle outcomes into a report stamped with the current UTC time.
pub fn build_report(
    config: &RecommendationConfig,
    config_hash: Option<String>,
    outcomes: Vec<ExperimentOutcome>,
) -> ExperimentReport {
    ExperimentReport {
        config: *config,
        config_hash,
        generated_at_utc: Utc::now(),
        outcomes,
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn warn_on_rate_drift(experiment_id: &str, row: &VariantRow) {
    let Some(stored) = row.conversion_rate else {
        return;
    };
    let recomputed = row.observation().conversion_rate();
    if (stored - recomputed).abs() > RATE_DRIFT_WARN_PCT {
        warn!(
            experiment_id,
            variant = %row.variant_name,
            stored,
            recomputed,
            "stored conversion_rate disagrees with counts; using counts"
        );
    }
}

fn partial_cmp_f64(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}
