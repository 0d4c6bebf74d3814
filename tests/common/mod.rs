//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use portfolio_report::loader::{InputTables, CRITERIA, DEBT_REGISTER, PRODUCTS, SCORES};
use portfolio_report::record_set::RecordSet;

pub const SCORES_HEADER: &str =
    "snapshot_date,product_id,criterion_id,score,score_weighted,criterion_weight\n";
pub const DEBT_HEADER: &str = "debt_id,product_id,risk_level,status\n";
pub const PRODUCTS_HEADER: &str = "product_id,name,criticality_weight\n";
pub const CRITERIA_CSV: &str = "criterion_id,label,weight\nC1,Security,1\nC2,Observability,2\n";

pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn set(name: &str, csv: &str) -> RecordSet {
    RecordSet::from_reader(name, csv.as_bytes()).unwrap()
}

/// Build the four tables from CSV bodies (header lines are prepended).
pub fn tables(products: &str, scores: &str, debt: &str) -> InputTables {
    InputTables {
        products: set(PRODUCTS, &format!("{PRODUCTS_HEADER}{products}")),
        criteria: set(CRITERIA, CRITERIA_CSV),
        scores: set(SCORES, &format!("{SCORES_HEADER}{scores}")),
        debt: set(DEBT_REGISTER, &format!("{DEBT_HEADER}{debt}")),
    }
}
