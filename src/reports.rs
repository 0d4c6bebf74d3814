use crate::error::Result;
use crate::loader::{debts_from, products_from, scores_from, InputTables};
use crate::types::{DebtItem, KpiRow, PortfolioSummary, Product, Score, SummaryStats};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Upper bound of the scoring scale; percentages are relative to it.
pub const SCORE_SCALE_MAX: f64 = 5.0;
/// Scores at or above this value count towards SAI.
pub const SAI_THRESHOLD: f64 = 4.0;
pub const HIGH_RISK: &str = "high";
pub const DONE_STATUS: &str = "done";

/// Derived tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    pub kpi: Vec<KpiRow>,
    pub summary: PortfolioSummary,
    /// Products present in the scores but absent from the product table.
    pub unmatched_products: Vec<String>,
    pub total_products: usize,
    pub total_open_high_debts: usize,
}

/// Weighted average score; zero when no criterion carries weight.
pub fn tci(total_weighted: f64, total_criteria_weight: f64) -> f64 {
    if total_criteria_weight == 0.0 {
        0.0
    } else {
        total_weighted / total_criteria_weight
    }
}

pub fn to_pct(value: f64) -> f64 {
    value / SCORE_SCALE_MAX * 100.0
}

/// Share of scores at or above `SAI_THRESHOLD`, as a percentage.
pub fn sai_pct(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let passing = scores.iter().filter(|s| **s >= SAI_THRESHOLD).count();
    passing as f64 / scores.len() as f64 * 100.0
}

/// One KPI row per (snapshot_date, product_id) present in `scores`, ordered
/// by that key. Debt and criticality columns are left for later joins.
pub fn compute_kpi(scores: &[Score]) -> Vec<KpiRow> {
    #[derive(Default)]
    struct Acc {
        total_weighted: f64,
        total_criteria_weight: f64,
        raw_scores: Vec<f64>,
    }

    let mut map: BTreeMap<(String, String), Acc> = BTreeMap::new();
    for s in scores {
        let e = map
            .entry((s.snapshot_date.clone(), s.product_id.clone()))
            .or_default();
        e.total_weighted += s.score_weighted;
        e.total_criteria_weight += s.criterion_weight;
        e.raw_scores.push(s.score);
    }
    debug!(groups = map.len(), scores = scores.len(), "grouped scores");

    map.into_iter()
        .map(|((snapshot_date, product_id), acc)| {
            let tci = tci(acc.total_weighted, acc.total_criteria_weight);
            let sai_pct = sai_pct(&acc.raw_scores);
            KpiRow {
                snapshot_date,
                product_id,
                total_weighted: acc.total_weighted,
                total_criteria_weight: acc.total_criteria_weight,
                raw_scores: acc.raw_scores,
                tci,
                tci_pct: to_pct(tci),
                sai_pct,
                open_high_debts: 0,
                criticality_weight: None,
                weighted_tci_portfolio_component: None,
            }
        })
        .collect()
}

pub fn is_open_high(d: &DebtItem) -> bool {
    d.risk_level == HIGH_RISK && d.status != DONE_STATUS
}

/// Open high-risk debt count per product. Debt carries no snapshot, so every
/// snapshot of a product gets the same current count.
pub fn open_high_debt_counts(debts: &[DebtItem]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for d in debts.iter().filter(|d| is_open_high(d)) {
        *counts.entry(d.product_id.as_str()).or_default() += 1;
    }
    counts
}

pub fn integrate_debt(mut kpi: Vec<KpiRow>, debts: &[DebtItem]) -> Vec<KpiRow> {
    let counts = open_high_debt_counts(debts);
    for row in &mut kpi {
        row.open_high_debts = counts.get(row.product_id.as_str()).copied().unwrap_or(0);
    }
    kpi
}

/// Left join of the product criticality onto KPI rows, filling the
/// portfolio component `tci * criticality_weight`.
pub fn attach_criticality(mut kpi: Vec<KpiRow>, products: &[Product]) -> Vec<KpiRow> {
    let weights: HashMap<&str, f64> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p.criticality_weight))
        .collect();
    let mut unmatched = BTreeSet::new();
    for row in &mut kpi {
        let tci = row.tci;
        row.criticality_weight = weights.get(row.product_id.as_str()).copied();
        row.weighted_tci_portfolio_component = row.criticality_weight.map(|w| tci * w);
        if row.criticality_weight.is_none() {
            unmatched.insert(row.product_id.clone());
        }
    }
    for product_id in unmatched {
        warn!(product_id = %product_id, "scored product has no criticality weight");
    }
    kpi
}

/// Criticality-weighted mean of the per-row TCI. Rows without a weight are
/// skipped. A zero weight sum divides by 1, so the result is the bare sum of
/// components rather than zero.
pub fn summarize_portfolio(kpi: &[KpiRow], generated_at: NaiveDateTime) -> PortfolioSummary {
    let weighted: f64 = kpi
        .iter()
        .filter_map(|r| r.weighted_tci_portfolio_component)
        .sum();
    let weight: f64 = kpi.iter().filter_map(|r| r.criticality_weight).sum();
    let divisor = if weight == 0.0 { 1.0 } else { weight };
    let portfolio_tci = weighted / divisor;
    PortfolioSummary {
        generated_at,
        portfolio_tci,
        portfolio_tci_pct: to_pct(portfolio_tci),
    }
}

/// Run the whole aggregation over the loaded tables.
pub fn build_report(tables: &InputTables, generated_at: NaiveDateTime) -> Result<PortfolioReport> {
    let products = products_from(&tables.products)?;
    let scores = scores_from(&tables.scores)?;
    let debts = debts_from(&tables.debt)?;

    let kpi = compute_kpi(&scores);
    let kpi = integrate_debt(kpi, &debts);
    let kpi = attach_criticality(kpi, &products);
    let summary = summarize_portfolio(&kpi, generated_at);

    let unmatched_products: Vec<String> = kpi
        .iter()
        .filter(|r| r.criticality_weight.is_none())
        .map(|r| r.product_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let total_open_high_debts = debts.iter().filter(|d| is_open_high(d)).count();

    Ok(PortfolioReport {
        kpi,
        summary,
        unmatched_products,
        total_products: products.len(),
        total_open_high_debts,
    })
}

pub fn generate_summary(report: &PortfolioReport) -> SummaryStats {
    let snapshots: BTreeSet<&str> = report.kpi.iter().map(|r| r.snapshot_date.as_str()).collect();
    SummaryStats {
        generated_at: report.summary.generated_at,
        portfolio_tci: report.summary.portfolio_tci,
        portfolio_tci_pct: report.summary.portfolio_tci_pct,
        total_products: report.total_products,
        total_snapshots: snapshots.len(),
        total_kpi_rows: report.kpi.len(),
        total_open_high_debts: report.total_open_high_debts,
        unmatched_products: report.unmatched_products.clone(),
    }
}
