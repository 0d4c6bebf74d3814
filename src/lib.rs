//! Portfolio quality and risk KPIs computed from product, criteria, score
//! and technical-debt tables, written out as a multi-sheet report.

pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod record_set;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
