use crate::util::{format_number, format_scores, format_timestamp};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub criticality_weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub snapshot_date: String,
    pub product_id: String,
    pub criterion_id: String,
    pub score: f64,
    pub score_weighted: f64,
    pub criterion_weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebtItem {
    pub product_id: String,
    pub risk_level: String,
    pub status: String,
}

/// One row of the KPI sheet, keyed by (snapshot_date, product_id).
///
/// `criticality_weight` stays `None` when the product has no row in the
/// product table; the portfolio sums skip such rows.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct KpiRow {
    pub snapshot_date: String,
    pub product_id: String,
    #[tabled(display_with = "display_2dp")]
    pub total_weighted: f64,
    #[tabled(display_with = "display_2dp")]
    pub total_criteria_weight: f64,
    #[serde(serialize_with = "serialize_scores")]
    #[tabled(display_with = "display_scores")]
    pub raw_scores: Vec<f64>,
    #[tabled(display_with = "display_2dp")]
    pub tci: f64,
    #[tabled(display_with = "display_2dp")]
    pub tci_pct: f64,
    #[tabled(display_with = "display_2dp")]
    pub sai_pct: f64,
    pub open_high_debts: usize,
    #[tabled(display_with = "display_opt_2dp")]
    pub criticality_weight: Option<f64>,
    #[tabled(display_with = "display_opt_2dp")]
    pub weighted_tci_portfolio_component: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PortfolioSummary {
    #[serde(serialize_with = "serialize_timestamp")]
    #[tabled(display_with = "display_timestamp")]
    pub generated_at: NaiveDateTime,
    #[tabled(display_with = "display_2dp")]
    pub portfolio_tci: f64,
    #[tabled(display_with = "display_2dp")]
    pub portfolio_tci_pct: f64,
}

/// Headline figures written next to the workbook as `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: NaiveDateTime,
    pub portfolio_tci: f64,
    pub portfolio_tci_pct: f64,
    pub total_products: usize,
    pub total_snapshots: usize,
    pub total_kpi_rows: usize,
    pub total_open_high_debts: usize,
    pub unmatched_products: Vec<String>,
}

fn serialize_scores<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_scores(v))
}

fn serialize_timestamp<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(t))
}

fn display_2dp(v: &f64) -> String {
    format_number(*v, 2)
}

fn display_opt_2dp(v: &Option<f64>) -> String {
    v.map(|x| format_number(x, 2)).unwrap_or_default()
}

fn display_scores(v: &[f64]) -> String {
    format_scores(v)
}

fn display_timestamp(t: &NaiveDateTime) -> String {
    format_timestamp(t)
}
