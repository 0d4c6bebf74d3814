use crate::error::{ReportError, Result};
use crate::loader::InputTables;
use crate::reports::{generate_summary, PortfolioReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const KPI_SHEET: &str = "KPI";
pub const SUMMARY_SHEET: &str = "PortfolioSummary";
pub const SUMMARY_JSON: &str = "summary.json";

pub const KPI_COLUMNS: [&str; 11] = [
    "snapshot_date",
    "product_id",
    "total_weighted",
    "total_criteria_weight",
    "raw_scores",
    "tci",
    "tci_pct",
    "sai_pct",
    "open_high_debts",
    "criticality_weight",
    "weighted_tci_portfolio_component",
];

pub const SUMMARY_COLUMNS: [&str; 3] = ["generated_at", "portfolio_tci", "portfolio_tci_pct"];

/// Header row is written explicitly so an empty sheet still carries it.
pub fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(headers)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|e| ReportError::io(path, e))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|e| ReportError::io(path, e))?;
    Ok(())
}

/// Write every sheet of the report into `dir`, one CSV per sheet in workbook
/// order, followed by `summary.json`. Returns the written paths.
///
/// Sheets are staged in a sibling directory and moved into place only once
/// all of them are written, so a failed run leaves any previous report in
/// `dir` as it was. A successful run replaces `dir` as a whole.
pub fn write_workbook(
    dir: &Path,
    tables: &InputTables,
    report: &PortfolioReport,
) -> Result<Vec<PathBuf>> {
    let staging = sibling(dir, "partial");
    remove_dir_if_exists(&staging)?;
    std::fs::create_dir_all(&staging).map_err(|e| ReportError::io(&staging, e))?;

    let files = match write_sheets(&staging, tables, report) {
        Ok(files) => files,
        Err(e) => {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }
    };
    publish(&staging, dir)?;

    let written: Vec<PathBuf> = files.iter().map(|f| dir.join(f)).collect();
    for path in &written {
        info!(path = %path.display(), "wrote sheet");
    }
    Ok(written)
}

fn write_sheets(dir: &Path, tables: &InputTables, report: &PortfolioReport) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for set in [&tables.products, &tables.criteria, &tables.scores, &tables.debt] {
        let file = format!("{}.csv", set.name);
        set.write_csv(&dir.join(&file))?;
        files.push(file);
    }

    let file = format!("{KPI_SHEET}.csv");
    write_csv(&dir.join(&file), &KPI_COLUMNS, &report.kpi)?;
    files.push(file);

    let file = format!("{SUMMARY_SHEET}.csv");
    write_csv(&dir.join(&file), &SUMMARY_COLUMNS, std::slice::from_ref(&report.summary))?;
    files.push(file);

    write_json(&dir.join(SUMMARY_JSON), &generate_summary(report))?;
    files.push(SUMMARY_JSON.to_string());

    Ok(files)
}

/// Swap the staged directory in for `dir`, restoring the previous report if
/// the final rename fails.
fn publish(staging: &Path, dir: &Path) -> Result<()> {
    let previous = sibling(dir, "previous");
    remove_dir_if_exists(&previous)?;
    let had_previous = dir.exists();
    if had_previous {
        std::fs::rename(dir, &previous).map_err(|e| ReportError::io(dir, e))?;
    }
    if let Err(e) = std::fs::rename(staging, dir) {
        if had_previous {
            let _ = std::fs::rename(&previous, dir);
        }
        let _ = std::fs::remove_dir_all(staging);
        return Err(ReportError::io(dir, e));
    }
    if had_previous {
        std::fs::remove_dir_all(&previous).map_err(|e| ReportError::io(&previous, e))?;
    }
    Ok(())
}

/// `out/report` -> `out/.report.<suffix>`
fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    dir.with_file_name(format!(".{name}.{suffix}"))
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| ReportError::io(path, e))?;
    }
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
