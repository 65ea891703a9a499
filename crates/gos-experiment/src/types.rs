use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use gos_stats::VariantObservation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Thresholds for the recommendation decision table (all in percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Below this confidence the test is inconclusive.
    pub inconclusive_below: f64,
    /// At or above this confidence the leading variant ships.
    pub ship_at: f64,
    /// Sample-size hint: additional visitors per missing confidence point.
    pub visitors_per_confidence_point: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            inconclusive_below: 80.0,
            ship_at: 95.0,
            visitors_per_confidence_point: 100.0,
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("inconclusive_below", self.inconclusive_below),
            ("ship_at", self.ship_at),
        ] {
            if !(0.0..=100.0).contains(&v) {
                bail!("CONFIG_INVALID recommendation.{name}={v} must be within [0, 100]");
            }
        }
        if self.inconclusive_below > self.ship_at {
            bail!(
                "CONFIG_INVALID recommendation.inconclusive_below={} exceeds ship_at={}",
                self.inconclusive_below,
                self.ship_at
            );
        }
        let per_point = self.visitors_per_confidence_point;
        if !per_point.is_finite() || per_point < 0.0 {
            bail!(
                "CONFIG_INVALID recommendation.visitors_per_confidence_point={per_point} must be >= 0"
            );
        }
        Ok(())
    }

    /// Read `/recommendation/*` from a merged config document.
    /// Missing keys keep their defaults; present keys must be numbers.
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        let mut cfg = Self::default();
        read_f64(
            config_json,
            "/recommendation/inconclusive_below",
            &mut cfg.inconclusive_below,
        )?;
        read_f64(config_json, "/recommendation/ship_at", &mut cfg.ship_at)?;
        read_f64(
            config_json,
            "/recommendation/visitors_per_confidence_point",
            &mut cfg.visitors_per_confidence_point,
        )?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn read_f64(v: &Value, pointer: &str, out: &mut f64) -> Result<()> {
    match v.pointer(pointer) {
        None | Some(Value::Null) => Ok(()),
        Some(x) => match x.as_f64() {
            Some(f) => {
                *out = f;
                Ok(())
            }
            None => bail!("CONFIG_INVALID {pointer} must be a number, got {x}"),
        },
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ShipB,
    ShipA,
    KeepRunning,
    Inconclusive,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::ShipB => "ship_b",
            RecommendationKind::ShipA => "ship_a",
            RecommendationKind::KeepRunning => "keep_running",
            RecommendationKind::Inconclusive => "inconclusive",
        }
    }

    /// Ordering used when several treatments compete for the lead.
    /// Higher is better for the treatment.
    pub(crate) fn leader_rank(&self) -> u8 {
        match self {
            RecommendationKind::ShipB => 3,
            RecommendationKind::KeepRunning => 2,
            RecommendationKind::Inconclusive => 1,
            RecommendationKind::ShipA => 0,
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the decision table for one control/treatment pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
    /// Rough extra visitors needed; only set while confidence is too low.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_sample_size: Option<u64>,
}

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// One row of the experiment variants table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRow {
    pub experiment_id: String,
    #[serde(alias = "name")]
    pub variant_name: String,
    pub is_control: bool,
    pub visitors: u64,
    pub conversions: u64,
    /// Stored rate (percent) as the table carries it. Informational only;
    /// evaluation always recomputes from counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
}

impl VariantRow {
    pub fn observation(&self) -> VariantObservation {
        VariantObservation::new(self.visitors, self.conversions)
    }
}

// ---------------------------------------------------------------------------
// Evaluation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    pub name: String,
    pub visitors: u64,
    pub conversions: u64,
    /// Recomputed conversion rate, percent.
    pub conversion_rate: f64,
}

impl From<&VariantRow> for VariantSummary {
    fn from(r: &VariantRow) -> Self {
        Self {
            name: r.variant_name.clone(),
            visitors: r.visitors,
            conversions: r.conversions,
            conversion_rate: r.observation().conversion_rate(),
        }
    }
}

/// One treatment measured against the experiment's control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantComparison {
    pub variant: VariantSummary,
    pub confidence: f64,
    pub uplift: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentEvaluation {
    pub experiment_id: String,
    pub control: VariantSummary,
    /// Stable order: variant name ascending. Names are unique.
    pub comparisons: Vec<VariantComparison>,
    /// Name of the leading treatment (see `pick_leader`).
    pub leader: Option<String>,
}

impl ExperimentEvaluation {
    pub fn leading_comparison(&self) -> Option<&VariantComparison> {
        let name = self.leader.as_deref()?;
        self.comparisons.iter().find(|c| c.variant.name == name)
    }

    pub fn is_leader(&self, comparison: &VariantComparison) -> bool {
        self.leader.as_deref() == Some(comparison.variant.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExperimentOutcome {
    Evaluated(ExperimentEvaluation),
    Skipped { experiment_id: String, reason: String },
}

impl ExperimentOutcome {
    pub fn experiment_id(&self) -> &str {
        match self {
            ExperimentOutcome::Evaluated(e) => &e.experiment_id,
            ExperimentOutcome::Skipped { experiment_id, .. } => experiment_id,
        }
    }

    pub fn evaluation(&self) -> Option<&ExperimentEvaluation> {
        match self {
            ExperimentOutcome::Evaluated(e) => Some(e),
            ExperimentOutcome::Skipped { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Full evaluation artifact (serializable to JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: RecommendationConfig,
    /// Hash of the layered config the thresholds came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    pub generated_at_utc: DateTime<Utc>,
    pub outcomes: Vec<ExperimentOutcome>,
}

/// Write the report as pretty-printed JSON to `out_dir/experiment_report.json`.
/// Returns the path written.
pub fn write_experiment_report_json(
    out_dir: &Path,
    report: &ExperimentReport,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join("experiment_report.json");
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(path)
}
