use std::env;
use std::fs;
use std::path::PathBuf;

use holdem_nash::config::*;
use holdem_nash::error::NashError;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("holdem-nash-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_from_file_partial() {
    let path = temp_file("partial.json", r#"{ "workers": 3, "seed": 12 }"#);
    let cfg = Config::from_file(&path).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(cfg.workers, Some(3));
    assert_eq!(cfg.seed, Some(12));
    assert_eq!(cfg.trials, DEFAULT_TRIALS);
    assert_eq!(cfg.table, None);
    assert_eq!(cfg.worker_count(), 3);
    assert_eq!(cfg.seed_or_random(), 12);
}

#[test]
fn test_from_file_full() {
    let path = temp_file(
        "full.json",
        r#"{ "table": "/data/HandRanks.dat", "workers": null, "seed": null, "trials": 500 }"#,
    );
    let cfg = Config::from_file(&path).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(cfg.table, Some(PathBuf::from("/data/HandRanks.dat")));
    assert_eq!(cfg.trials, 500);
    assert_eq!(cfg.worker_count(), rayon::current_num_threads());
}

#[test]
fn test_bad_json_and_missing_file() {
    let path = temp_file("bad.json", "{ workers: }");
    assert!(matches!(Config::from_file(&path), Err(NashError::Json(_))));
    fs::remove_file(&path).ok();

    assert!(matches!(
        Config::from_file("/nonexistent/nash.json"),
        Err(NashError::Io(_))
    ));
}

#[test]
fn test_explicit_table_wins_over_env() {
    let cfg = Config {
        table: Some(PathBuf::from("explicit.dat")),
        ..Config::default()
    }
    .with_env();
    assert_eq!(cfg.table, Some(PathBuf::from("explicit.dat")));
}

#[test]
fn test_serializes_round_trip() {
    let cfg = Config {
        workers: Some(8),
        ..Config::default()
    };
    let text = serde_json::to_string(&cfg).unwrap();
    let back: Config = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
}
