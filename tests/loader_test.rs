//! Tests for loading the input tables from disk.

mod common;

use common::{fixed_clock, CRITERIA_CSV, DEBT_HEADER, PRODUCTS_HEADER, SCORES_HEADER};
use portfolio_report::config::InputConfig;
use portfolio_report::loader::load_inputs;
use portfolio_report::reports::build_report;
use portfolio_report::ReportError;

fn write_inputs(dir: &std::path::Path) {
    std::fs::write(dir.join("Products.csv"), format!("{PRODUCTS_HEADER}P1,Billing,2\nP2,Search,1\n")).unwrap();
    std::fs::write(dir.join("Criteria.csv"), CRITERIA_CSV).unwrap();
    std::fs::write(
        dir.join("Scores.csv"),
        format!("{SCORES_HEADER}2024-01-31,P1,C1,4,4,1\n2024-01-31,P1,C2,5,10,2\n2024-01-31,P2,C1,2,2,1\n"),
    )
    .unwrap();
    std::fs::write(dir.join("DebtRegister.csv"), format!("{DEBT_HEADER}T1,P2,high,open\n")).unwrap();
}

#[test]
fn loads_all_tables_from_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    write_inputs(dir.path());
    let cfg = InputConfig {
        dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let (tables, report) = load_inputs(&cfg).unwrap();
    assert_eq!(report.products, 2);
    assert_eq!(report.criteria, 2);
    assert_eq!(report.scores, 3);
    assert_eq!(report.debts, 1);
    assert_eq!(tables.scores.name, "Scores");

    let result = build_report(&tables, fixed_clock()).unwrap();
    assert_eq!(result.kpi.len(), 2);
    let p1 = &result.kpi[0];
    assert!((p1.tci - 14.0 / 3.0).abs() < 1e-9);
    assert_eq!(p1.sai_pct, 100.0);
    let p2 = &result.kpi[1];
    assert_eq!(p2.tci, 2.0);
    assert_eq!(p2.open_high_debts, 1);
}

#[test]
fn missing_input_file_names_the_path() {
    let dir = tempfile::TempDir::new().unwrap();
    write_inputs(dir.path());
    std::fs::remove_file(dir.path().join("DebtRegister.csv")).unwrap();
    let cfg = InputConfig {
        dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    match load_inputs(&cfg).unwrap_err() {
        ReportError::Io { path, .. } => assert!(path.ends_with("DebtRegister.csv")),
        other => panic!("unexpected error: {other}"),
    }
}
