//! `gos evaluate` over a CSV export writes the report and comparisons CSV,
//! and prints one line per comparison.

use assert_cmd::Command;
use predicates::prelude::*;

const ROWS_CSV: &str = "\
experiment_id,variant_name,is_control,visitors,conversions,conversion_rate
pricing-page,Control,true,1000,50,5.0
pricing-page,Annual first,false,1000,75,7.5
orphan,Lonely,false,10,1,10.0
broken,row,with,too,few
";

fn gos() -> Command {
    let mut cmd = Command::cargo_bin("gos").expect("gos binary");
    cmd.env_remove("GOS_CONFIG").env("RUST_LOG", "warn");
    cmd
}

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("gos_cli_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn evaluate_writes_report_and_csv() {
    let dir = temp_dir("evaluate");
    let rows = dir.join("variants.csv");
    std::fs::write(&rows, ROWS_CSV).unwrap();
    let out = dir.join("out");
    let csv = dir.join("out").join("comparisons.csv");

    gos()
        .arg("evaluate")
        .arg("--rows")
        .arg(&rows)
        .arg("--out")
        .arg(&out)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "experiment=pricing-page control=Control control_rate=5.00 variant=Annual first",
        ))
        .stdout(predicate::str::contains("uplift=+50.00"))
        .stdout(predicate::str::contains("recommendation=ship_b leader=true"))
        .stdout(predicate::str::contains("experiment=orphan skipped=true"))
        .stdout(predicate::str::contains("evaluated=1 skipped=1 rows_skipped=1"));

    let raw = std::fs::read_to_string(out.join("experiment_report.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["config"]["ship_at"], 95.0);
    assert!(v.get("config_hash").is_none(), "no config => no hash");
    assert_eq!(v["outcomes"].as_array().unwrap().len(), 2);

    let csv_text = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(csv_text.lines().count(), 2);
    assert!(csv_text.contains("pricing-page,Control,Annual first,5.0000,7.5000"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn evaluate_reads_paths_from_config() {
    let dir = temp_dir("evaluate_cfg");
    let rows = dir.join("variants.csv");
    std::fs::write(&rows, ROWS_CSV).unwrap();
    let out = dir.join("reports");

    let cfg = dir.join("gos.yaml");
    std::fs::write(
        &cfg,
        format!(
            "ingest:\n  rows_path: \"{}\"\nreport:\n  out_dir: \"{}\"\n",
            rows.display().to_string().replace('\\', "/"),
            out.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    gos()
        .arg("evaluate")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("report_path="));

    let raw = std::fs::read_to_string(out.join("experiment_report.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["config_hash"].as_str().map(str::len), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn evaluate_without_rows_fails() {
    gos()
        .arg("evaluate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no rows path"));
}

#[test]
fn strict_config_rejects_unused_keys() {
    let dir = temp_dir("evaluate_strict");
    let cfg = dir.join("gos.yaml");
    std::fs::write(&cfg, "recommendation:\n  shipat: 90\n").unwrap();

    gos()
        .args(["evaluate", "--rows", "unused.csv", "--strict-config", "--config"])
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let dir = temp_dir("config_hash");
    let cfg = dir.join("gos.yaml");
    std::fs::write(&cfg, "recommendation:\n  ship_at: 95\n").unwrap();

    gos()
        .arg("config-hash")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"config_hash=[0-9a-f]{64}").unwrap())
        .stdout(predicate::str::contains(r#"{"recommendation":{"ship_at":95}}"#));

    let _ = std::fs::remove_dir_all(&dir);
}
