//! `gos evaluate`: rows file -> per-experiment recommendations (+ report/CSV).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gos_config::UnusedKeyPolicy;
use gos_experiment::{
    build_report, comparisons_to_csv, evaluate_all, load_rows, write_experiment_report_json,
    ExperimentOutcome,
};
use tracing::{info, warn};

use super::load_config;

pub struct EvaluateArgs {
    pub rows: Option<String>,
    pub config_paths: Vec<String>,
    pub out: Option<String>,
    pub csv: Option<String>,
    pub strict_config: bool,
}

pub fn run(args: EvaluateArgs) -> Result<()> {
    let policy = if args.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let cfg = load_config(&args.config_paths, policy)?;

    // CLI flags win over config values.
    let rows_path = args
        .rows
        .or_else(|| cfg.str_at("/ingest/rows_path"))
        .context("no rows path: pass --rows or set ingest.rows_path in config")?;
    let out_dir = args.out.or_else(|| cfg.str_at("/report/out_dir"));
    let csv_path = args.csv.or_else(|| cfg.str_at("/report/csv_path"));

    let parsed = load_rows(Path::new(&rows_path))
        .with_context(|| format!("failed to load rows: {rows_path}"))?;
    if parsed.skipped > 0 {
        warn!(skipped = parsed.skipped, path = %rows_path, "unparseable rows dropped");
    }
    info!(rows = parsed.rows.len(), path = %rows_path, "rows loaded");

    let outcomes = evaluate_all(&cfg.recommendation, &parsed.rows);

    let mut evaluated = 0usize;
    let mut skipped = 0usize;
    for outcome in &outcomes {
        match outcome {
            ExperimentOutcome::Evaluated(eval) => {
                evaluated += 1;
                for c in &eval.comparisons {
                    println!(
                        "experiment={} control={} control_rate={:.2} variant={} variant_rate={:.2} \
                         uplift={:+.2} confidence={:.2} recommendation={} leader={}",
                        eval.experiment_id,
                        eval.control.name,
                        eval.control.conversion_rate,
                        c.variant.name,
                        c.variant.conversion_rate,
                        c.uplift,
                        c.confidence,
                        c.recommendation.kind,
                        eval.is_leader(c)
                    );
                }
                if let Some(lead) = eval.leading_comparison() {
                    println!(
                        "experiment={} message={}",
                        eval.experiment_id, lead.recommendation.message
                    );
                }
            }
            ExperimentOutcome::Skipped {
                experiment_id,
                reason,
            } => {
                skipped += 1;
                println!("experiment={experiment_id} skipped=true reason={reason}");
            }
        }
    }

    if let Some(path) = csv_path {
        let evaluations: Vec<_> = outcomes
            .iter()
            .filter_map(|o| o.evaluation().cloned())
            .collect();
        if let Some(parent) = Path::new(&path).parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create csv dir failed: {}", parent.display()))?;
        }
        fs::write(&path, comparisons_to_csv(&evaluations)?)
            .with_context(|| format!("write csv failed: {path}"))?;
        println!("csv_path={path}");
    }

    if let Some(dir) = out_dir {
        let report = build_report(&cfg.recommendation, cfg.config_hash(), outcomes);
        let written = write_experiment_report_json(Path::new(&dir), &report)
            .with_context(|| format!("write report failed: {dir}"))?;
        println!("report_path={}", written.display());
    }

    println!(
        "evaluated={evaluated} skipped={skipped} rows_skipped={}",
        parsed.skipped
    );
    Ok(())
}
