// Entry point: a single batch run.
//
// Loads the four input tables, computes KPI and portfolio summary, writes the
// report directory and prints short previews of the derived sheets.
use clap::Parser;
use portfolio_report::config::{CliOverrides, ReportConfig};
use portfolio_report::{loader, output, reports, util};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio_report")]
#[command(version, about = "Portfolio convergence KPI report", long_about = None)]
struct Cli {
    /// Config file (defaults to ./portfolio.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding Products.csv, Criteria.csv, Scores.csv, DebtRegister.csv
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory the report sheets are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Rows shown in each console preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Skip the console previews
    #[arg(long)]
    no_preview: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> portfolio_report::Result<()> {
    let overrides = CliOverrides {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        preview_rows: cli.preview_rows,
    };
    let cfg = ReportConfig::load(&PathBuf::from("."), cli.config.as_deref(), Some(&overrides))?;

    let (tables, load_report) = loader::load_inputs(&cfg.input)?;
    println!(
        "Processing dataset... ({} products, {} criteria, {} scores, {} debt items)\n",
        util::format_int(load_report.products),
        util::format_int(load_report.criteria),
        util::format_int(load_report.scores),
        util::format_int(load_report.debts),
    );

    let report = reports::build_report(&tables, chrono::Utc::now().naive_utc())?;
    output::write_workbook(&cfg.output.dir, &tables, &report)?;

    if !cli.no_preview {
        println!("KPI (per snapshot and product)\n");
        output::preview_table_rows(&report.kpi, cfg.output.preview_rows);
        println!("Portfolio Summary\n");
        output::preview_table_rows(std::slice::from_ref(&report.summary), 1);
    }
    if !report.unmatched_products.is_empty() {
        println!(
            "Note: {} scored product(s) without criticality weight: {}",
            report.unmatched_products.len(),
            report.unmatched_products.join(", ")
        );
    }
    println!("Report generated: {}", cfg.output.dir.display());
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "report run failed");
            eprintln!("Failed to generate report: {}", e);
            ExitCode::FAILURE
        }
    }
}
