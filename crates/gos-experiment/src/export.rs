use anyhow::{Context, Result};

use crate::types::ExperimentEvaluation;

const CSV_HEADER: [&str; 10] = [
    "experiment_id",
    "control",
    "variant",
    "control_rate",
    "variant_rate",
    "uplift",
    "confidence",
    "recommendation",
    "suggested_sample_size",
    "is_leader",
];

/// One CSV line per treatment comparison, in evaluation order.
/// Rates, uplift and confidence are percentages with 4 decimals.
pub fn comparisons_to_csv(evaluations: &[ExperimentEvaluation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for eval in evaluations {
        for c in &eval.comparisons {
            let suggested = c
                .recommendation
                .suggested_sample_size
                .map(|n| n.to_string())
                .unwrap_or_default();
            let record = [
                eval.experiment_id.clone(),
                eval.control.name.clone(),
                c.variant.name.clone(),
                format!("{:.4}", eval.control.conversion_rate),
                format!("{:.4}", c.variant.conversion_rate),
                format!("{:.4}", c.uplift),
                format!("{:.4}", c.confidence),
                c.recommendation.kind.to_string(),
                suggested,
                eval.is_leader(c).to_string(),
            ];
            wtr.write_record(&record)?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context("flush comparisons csv")?;
    String::from_utf8(bytes).context("comparisons csv is not utf-8")
}
