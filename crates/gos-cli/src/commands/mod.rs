//! Command handler modules for the `gos` CLI.
//!
//! Shared config plumbing lives here; command logic lives in the submodules.

pub mod evaluate;
pub mod stats;

use anyhow::{Context, Result};
use gos_config::{LoadedConfig, UnusedKeyPolicy};
use gos_experiment::RecommendationConfig;
use tracing::info;

/// Env var holding comma-separated config paths, used when no `--config` is given.
pub const ENV_CONFIG_PATHS: &str = "GOS_CONFIG";

/// Thresholds plus the config they came from (None => built-in defaults).
pub struct ResolvedConfig {
    pub loaded: Option<LoadedConfig>,
    pub recommendation: RecommendationConfig,
}

impl ResolvedConfig {
    pub fn config_hash(&self) -> Option<String> {
        self.loaded.as_ref().map(|l| l.config_hash.clone())
    }

    /// String value at `pointer` in the loaded config, if any.
    pub fn str_at(&self, pointer: &str) -> Option<String> {
        self.loaded
            .as_ref()?
            .config_json
            .pointer(pointer)?
            .as_str()
            .map(str::to_string)
    }
}

/// CLI paths win; otherwise split `GOS_CONFIG` on commas.
pub fn resolve_config_paths(cli_paths: &[String]) -> Vec<String> {
    if !cli_paths.is_empty() {
        return cli_paths.to_vec();
    }
    std::env::var(ENV_CONFIG_PATHS)
        .ok()
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Load layered config (if any paths resolve), run the unused-key guard, and
/// read the recommendation thresholds.
pub fn load_config(cli_paths: &[String], policy: UnusedKeyPolicy) -> Result<ResolvedConfig> {
    let paths = resolve_config_paths(cli_paths);
    if paths.is_empty() {
        return Ok(ResolvedConfig {
            loaded: None,
            recommendation: RecommendationConfig::default(),
        });
    }

    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = gos_config::load_layered_yaml(&path_refs)?;
    gos_config::report_unused_keys(&loaded.config_json, policy)?;

    let recommendation = RecommendationConfig::from_config_json(&loaded.config_json)
        .context("invalid recommendation thresholds")?;

    info!(
        config_hash = %loaded.config_hash,
        layers = paths.len(),
        "config loaded"
    );

    Ok(ResolvedConfig {
        loaded: Some(loaded),
        recommendation,
    })
}
