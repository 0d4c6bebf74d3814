//! Report configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via `apply_cli_overrides`)
//! 2. Environment variables (`PORTFOLIO_*`)
//! 3. Config file (`portfolio.toml`, or an explicit path)
//! 4. Compiled defaults

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "portfolio.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub products: String,
    pub criteria: String,
    pub scores: String,
    pub debt: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            dir: PathBuf::from("."),
            products: "Products.csv".to_string(),
            criteria: "Criteria.csv".to_string(),
            scores: "Scores.csv".to_string(),
            debt: "DebtRegister.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("Portfolio_Convergence"),
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub preview_rows: Option<usize>,
}

impl ReportConfig {
    /// Resolve the configuration. An explicit `config_path` must exist; the
    /// default `portfolio.toml` under `root` is optional.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        cli: Option<&CliOverrides>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = root.join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        if let Some(cli) = cli {
            config.apply_cli_overrides(cli);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        toml::from_str(&text).map_err(|e| ReportError::Config {
            field: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ReportError::Config {
            field: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let files = [
            ("input.products", &self.input.products),
            ("input.criteria", &self.input.criteria),
            ("input.scores", &self.input.scores),
            ("input.debt", &self.input.debt),
        ];
        for (field, name) in files {
            if name.trim().is_empty() {
                return Err(ReportError::Config {
                    field: field.to_string(),
                    message: "file name must not be empty".to_string(),
                });
            }
        }
        if self.output.dir.as_os_str().is_empty() {
            return Err(ReportError::Config {
                field: "output.dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        // Sheets share the input file names.
        if resolved(&self.output.dir) == resolved(&self.input.dir) {
            return Err(ReportError::Config {
                field: "output.dir".to_string(),
                message: "must differ from input.dir".to_string(),
            });
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PORTFOLIO_INPUT_DIR") {
            self.input.dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PORTFOLIO_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PORTFOLIO_PREVIEW_ROWS") {
            match val.parse::<usize>() {
                Ok(v) => self.output.preview_rows = v,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid PORTFOLIO_PREVIEW_ROWS"),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(dir) = &cli.input_dir {
            self.input.dir = dir.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(rows) = cli.preview_rows {
            self.output.preview_rows = rows;
        }
    }
}

/// Absolute form of `path` without `.` components, resolved through the
/// filesystem when it exists.
fn resolved(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    abs.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl InputConfig {
    pub fn products_path(&self) -> PathBuf {
        self.dir.join(&self.products)
    }

    pub fn criteria_path(&self) -> PathBuf {
        self.dir.join(&self.criteria)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.dir.join(&self.scores)
    }

    pub fn debt_path(&self) -> PathBuf {
        self.dir.join(&self.debt)
    }
}
