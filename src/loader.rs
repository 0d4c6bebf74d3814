use crate::config::InputConfig;
use crate::error::{ReportError, Result};
use crate::record_set::RecordSet;
use crate::types::{DebtItem, Product, Score};
use crate::util::parse_f64_safe;
use std::collections::HashSet;
use tracing::{info, warn};

pub const PRODUCTS: &str = "Products";
pub const CRITERIA: &str = "Criteria";
pub const SCORES: &str = "Scores";
pub const DEBT_REGISTER: &str = "DebtRegister";

/// The four input tables, kept verbatim for the report.
#[derive(Debug, Clone)]
pub struct InputTables {
    pub products: RecordSet,
    pub criteria: RecordSet,
    pub scores: RecordSet,
    pub debt: RecordSet,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub products: usize,
    pub criteria: usize,
    pub scores: usize,
    pub debts: usize,
}

pub fn load_inputs(cfg: &InputConfig) -> Result<(InputTables, LoadReport)> {
    let tables = InputTables {
        products: RecordSet::from_path(PRODUCTS, &cfg.products_path())?,
        criteria: RecordSet::from_path(CRITERIA, &cfg.criteria_path())?,
        scores: RecordSet::from_path(SCORES, &cfg.scores_path())?,
        debt: RecordSet::from_path(DEBT_REGISTER, &cfg.debt_path())?,
    };
    let report = LoadReport {
        products: tables.products.len(),
        criteria: tables.criteria.len(),
        scores: tables.scores.len(),
        debts: tables.debt.len(),
    };
    info!(
        products = report.products,
        criteria = report.criteria,
        scores = report.scores,
        debts = report.debts,
        dir = %cfg.dir.display(),
        "loaded input tables"
    );
    Ok((tables, report))
}

fn text(set: &RecordSet, row: usize, col: usize) -> String {
    set.cell(row, col).trim().to_string()
}

fn number(set: &RecordSet, row: usize, col: usize) -> Result<f64> {
    let raw = set.cell(row, col);
    parse_f64_safe(Some(raw)).ok_or_else(|| ReportError::InvalidValue {
        table: set.name.clone(),
        row: row + 1,
        column: set.headers[col].trim().to_string(),
        value: raw.to_string(),
    })
}

/// Typed product rows. Later duplicates of a `product_id` are dropped so the
/// criticality join stays one-to-one.
pub fn products_from(set: &RecordSet) -> Result<Vec<Product>> {
    let [id, weight] = set.require_columns(["product_id", "criticality_weight"])?;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(set.len());
    for row in 0..set.len() {
        let product_id = text(set, row, id);
        let criticality_weight = number(set, row, weight)?;
        if !seen.insert(product_id.clone()) {
            warn!(product_id = %product_id, row = row + 1, "duplicate product row ignored");
            continue;
        }
        out.push(Product {
            product_id,
            criticality_weight,
        });
    }
    Ok(out)
}

pub fn scores_from(set: &RecordSet) -> Result<Vec<Score>> {
    let [date, product, criterion, score, weighted, weight] = set.require_columns([
        "snapshot_date",
        "product_id",
        "criterion_id",
        "score",
        "score_weighted",
        "criterion_weight",
    ])?;
    (0..set.len())
        .map(|row| {
            Ok(Score {
                snapshot_date: text(set, row, date),
                product_id: text(set, row, product),
                criterion_id: text(set, row, criterion),
                score: number(set, row, score)?,
                score_weighted: number(set, row, weighted)?,
                criterion_weight: number(set, row, weight)?,
            })
        })
        .collect()
}

pub fn debts_from(set: &RecordSet) -> Result<Vec<DebtItem>> {
    let [product, risk, status] = set.require_columns(["product_id", "risk_level", "status"])?;
    Ok((0..set.len())
        .map(|row| DebtItem {
            product_id: text(set, row, product),
            risk_level: text(set, row, risk),
            status: text(set, row, status),
        })
        .collect())
}
