//! Tests for configuration resolution.

use std::path::PathBuf;
use std::sync::Mutex;

use portfolio_report::config::{CliOverrides, ReportConfig, DEFAULT_CONFIG_FILE};
use portfolio_report::ReportError;

/// Serializes tests that touch `PORTFOLIO_*` environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "PORTFOLIO_INPUT_DIR",
        "PORTFOLIO_OUTPUT_DIR",
        "PORTFOLIO_PREVIEW_ROWS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_config_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = ReportConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(cfg, ReportConfig::default());
    assert_eq!(cfg.input.scores_path(), PathBuf::from("./Scores.csv"));
    assert_eq!(cfg.output.dir, PathBuf::from("Portfolio_Convergence"));
    assert_eq!(cfg.output.preview_rows, 5);
}

#[test]
fn layered_resolution_cli_over_env_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE),
        r#"
[input]
dir = "data"
debt = "Debt.csv"

[output]
dir = "from-file"
preview_rows = 3
"#,
    )
    .unwrap();

    std::env::set_var("PORTFOLIO_OUTPUT_DIR", "from-env");
    std::env::set_var("PORTFOLIO_PREVIEW_ROWS", "8");
    let cli = CliOverrides {
        preview_rows: Some(12),
        ..Default::default()
    };
    let cfg = ReportConfig::load(dir.path(), None, Some(&cli)).unwrap();

    assert_eq!(cfg.input.dir, PathBuf::from("data"));
    assert_eq!(cfg.input.debt_path(), PathBuf::from("data/Debt.csv"));
    assert_eq!(cfg.input.products, "Products.csv");
    assert_eq!(cfg.output.dir, PathBuf::from("from-env"));
    assert_eq!(cfg.output.preview_rows, 12);
    clear_env();
}

#[test]
fn invalid_env_preview_rows_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("PORTFOLIO_PREVIEW_ROWS", "many");
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = ReportConfig::load(dir.path(), None, None).unwrap();
    assert_eq!(cfg.output.preview_rows, 5);
    clear_env();
}

#[test]
fn explicit_config_path_must_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = ReportConfig::load(dir.path(), Some(&missing), None).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = ReportConfig::from_toml("[output\ndir = 1").unwrap_err();
    assert!(matches!(err, ReportError::Config { .. }));
}

#[test]
fn validation_rejects_empty_names_and_shared_dirs() {
    let cfg = ReportConfig::from_toml("[input]\nscores = \"\"\n").unwrap();
    match cfg.validate().unwrap_err() {
        ReportError::Config { field, .. } => assert_eq!(field, "input.scores"),
        other => panic!("unexpected error: {other}"),
    }

    let cfg = ReportConfig::from_toml("[input]\ndir = \"out\"\n[output]\ndir = \"out\"\n").unwrap();
    match cfg.validate().unwrap_err() {
        ReportError::Config { field, .. } => assert_eq!(field, "output.dir"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn output_dir_spelled_differently_from_input_dir_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    std::fs::create_dir_all(&data).unwrap();

    let mut cfg = ReportConfig::default();
    cfg.input.dir = tmp.path().join(".").join("data");
    cfg.output.dir = data.join("");
    match cfg.validate().unwrap_err() {
        ReportError::Config { field, .. } => assert_eq!(field, "output.dir"),
        other => panic!("unexpected error: {other}"),
    }

    // Not on disk yet: compared lexically.
    let mut cfg = ReportConfig::default();
    cfg.input.dir = PathBuf::from("./portfolio-inputs-not-created");
    cfg.output.dir = PathBuf::from("portfolio-inputs-not-created");
    assert!(matches!(cfg.validate(), Err(ReportError::Config { .. })));

    let mut cfg = ReportConfig::default();
    cfg.input.dir = data.clone();
    cfg.output.dir = tmp.path().join("report");
    assert!(cfg.validate().is_ok());
}
