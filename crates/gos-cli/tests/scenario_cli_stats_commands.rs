//! Single-shot statistics commands print key=value lines on stdout.

use assert_cmd::Command;
use predicates::prelude::*;

fn gos() -> Command {
    let mut cmd = Command::cargo_bin("gos").expect("gos binary");
    cmd.env_remove("GOS_CONFIG").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn confidence_end_to_end_scenario() {
    gos()
        .args([
            "confidence",
            "--visitors-a",
            "1000",
            "--conversions-a",
            "50",
            "--visitors-b",
            "1000",
            "--conversions-b",
            "75",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("confidence=97.9"))
        .stdout(predicate::str::contains("pooled=0.062500"));
}

#[test]
fn confidence_zero_visitors_is_degenerate() {
    gos()
        .args([
            "confidence",
            "--visitors-a",
            "0",
            "--conversions-a",
            "0",
            "--visitors-b",
            "100",
            "--conversions-b",
            "50",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("confidence=0.0000"))
        .stdout(predicate::str::contains("degenerate=true"));
}

#[test]
fn uplift_signs() {
    gos()
        .args(["uplift", "--rate-a", "10", "--rate-b", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uplift=100.0000"));
    gos()
        .args(["uplift", "--rate-a", "20", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uplift=-50.0000"));
    gos()
        .args(["uplift", "--rate-a", "0", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uplift=0.0000"));
}

#[test]
fn recommend_defaults() {
    gos()
        .args(["recommend", "--confidence", "95", "--rate-a", "5", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=ship_b"))
        .stdout(predicate::str::contains("config_hash=").not());

    gos()
        .args(["recommend", "--confidence", "79.9", "--rate-a", "5", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=inconclusive"))
        .stdout(predicate::str::contains("suggested_sample_size=1510"));
}

#[test]
fn recommend_with_stricter_config() {
    let dir = std::env::temp_dir().join(format!("gos_cli_recommend_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let cfg = dir.join("strict.yaml");
    std::fs::write(&cfg, "recommendation:\n  ship_at: 99\n").unwrap();

    gos()
        .args(["recommend", "--confidence", "97", "--rate-a", "5", "--rate-b", "10"])
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=keep_running"))
        .stdout(predicate::str::contains("config_hash="));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recommend_reads_layered_config_from_env() {
    let dir = std::env::temp_dir().join(format!("gos_cli_env_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let base = dir.join("base.yaml");
    let overlay = dir.join("override.yaml");
    std::fs::write(
        &base,
        "recommendation:\n  ship_at: 99\n  inconclusive_below: 90\n",
    )
    .unwrap();
    std::fs::write(&overlay, "recommendation:\n  ship_at: 96\n").unwrap();
    let env_paths = format!("{}, {}", base.display(), overlay.display());

    // 97 ships only because the overlay lowered ship_at from 99 to 96.
    gos()
        .env("GOS_CONFIG", &env_paths)
        .args(["recommend", "--confidence", "97", "--rate-a", "5", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=ship_b"))
        .stdout(predicate::str::contains("config_hash="));

    // inconclusive_below=90 still comes from the base layer.
    gos()
        .env("GOS_CONFIG", &env_paths)
        .args(["recommend", "--confidence", "85", "--rate-a", "5", "--rate-b", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=inconclusive"))
        .stdout(predicate::str::contains("config_hash="));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recommend_accepts_negative_rates_like_uplift() {
    gos()
        .args(["recommend", "--confidence", "96", "--rate-a", "-1", "--rate-b", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=ship_b"));
}

#[test]
fn sample_size_textbook_and_invalid() {
    gos()
        .args(["sample-size", "--baseline-rate", "0.05", "--mde", "0.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("per_variant=8"))
        .stdout(predicate::str::contains("total="));

    gos()
        .args(["sample-size", "--baseline-rate", "0", "--mde", "0.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no sample size"));
}
