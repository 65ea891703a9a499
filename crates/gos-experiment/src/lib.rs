//! gos-experiment
//!
//! Turns variant rows from the experiments table into per-experiment
//! recommendations: ingest rows, group by experiment, compare every treatment
//! against its control, pick a leader, and export the result.

mod evaluator;
mod export;
mod ingest;
mod recommend;
mod types;

pub use evaluator::{
    build_report, compare_variants, evaluate_all, evaluate_experiment, group_rows, pick_leader,
    EvaluateError,
};
pub use export::comparisons_to_csv;
pub use ingest::{
    load_rows, parse_is_control, parse_rows_csv, parse_rows_json, IngestError, ParsedRows,
};
pub use recommend::{get_recommendation, recommend, suggested_sample_size};
pub use types::{
    write_experiment_report_json, ExperimentEvaluation, ExperimentOutcome, ExperimentReport,
    Recommendation, RecommendationConfig, RecommendationKind, VariantComparison, VariantRow,
    VariantSummary,
};
