use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gos")]
#[command(about = "Growth OS experiment statistics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Confidence (%) that two variants' conversion rates differ
    Confidence {
        #[arg(long)]
        visitors_a: u64,
        #[arg(long)]
        conversions_a: u64,
        #[arg(long)]
        visitors_b: u64,
        #[arg(long)]
        conversions_b: u64,
    },

    /// Relative change (%) of rate B over rate A
    Uplift {
        #[arg(long, allow_negative_numbers = true)]
        rate_a: f64,
        #[arg(long, allow_negative_numbers = true)]
        rate_b: f64,
    },

    /// Recommendation for a confidence value and two rates
    Recommend {
        #[arg(long, allow_negative_numbers = true)]
        confidence: f64,
        #[arg(long, allow_negative_numbers = true)]
        rate_a: f64,
        #[arg(long, allow_negative_numbers = true)]
        rate_b: f64,

        /// Layered config paths in merge order (falls back to GOS_CONFIG)
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Visitors needed per variant (power analysis, two-sided)
    SampleSize {
        /// Control conversion proportion (0.05 = 5%)
        #[arg(long)]
        baseline_rate: f64,

        /// Minimum detectable effect relative to baseline (0.10 = +10%)
        #[arg(long)]
        mde: f64,

        #[arg(long, default_value_t = 0.05)]
        alpha: f64,

        #[arg(long, default_value_t = 0.80)]
        power: f64,
    },

    /// Evaluate every experiment in an exported variants table (.json / .csv)
    Evaluate {
        /// Rows file (falls back to config /ingest/rows_path)
        #[arg(long)]
        rows: Option<String>,

        /// Layered config paths in merge order (falls back to GOS_CONFIG)
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Directory for experiment_report.json (falls back to /report/out_dir)
        #[arg(long)]
        out: Option<String>,

        /// Path for the comparisons CSV (falls back to /report/csv_path)
        #[arg(long)]
        csv: Option<String>,

        /// Fail instead of warn when the config carries unused keys
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent when missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Confidence {
            visitors_a,
            conversions_a,
            visitors_b,
            conversions_b,
        } => commands::stats::confidence(visitors_a, conversions_a, visitors_b, conversions_b),

        Commands::Uplift { rate_a, rate_b } => commands::stats::uplift(rate_a, rate_b),

        Commands::Recommend {
            confidence,
            rate_a,
            rate_b,
            config_paths,
        } => commands::stats::recommend(confidence, rate_a, rate_b, &config_paths),

        Commands::SampleSize {
            baseline_rate,
            mde,
            alpha,
            power,
        } => commands::stats::sample_size(baseline_rate, mde, alpha, power),

        Commands::Evaluate {
            rows,
            config_paths,
            out,
            csv,
            strict_config,
        } => commands::evaluate::run(commands::evaluate::EvaluateArgs {
            rows,
            config_paths,
            out,
            csv,
            strict_config,
        }),

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = gos_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(())
        }
    }
}

/// Logs go to stderr; stdout is reserved for key=value output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
