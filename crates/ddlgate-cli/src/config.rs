//! Configuration file handling

use std::path::{Path, PathBuf};

use ddlgate_core::{DetailCode, OptimizationType};
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use crate::args::OutputFormat;

pub const CONFIG_FILE_NAME: &str = "ddlgate.toml";

/// Configuration for ddlgate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Schema file paths or patterns
    #[serde(default)]
    pub files: Vec<String>,

    /// Output format (human, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Optimization type (read_heavy, write_heavy, balanced)
    #[serde(default)]
    pub optimization: Option<String>,

    /// Warning codes to suppress (e.g., ["NO_PRIMARY_KEY"])
    #[serde(default)]
    pub disable: Vec<String>,

    /// Treat remaining warnings as failures
    #[serde(default)]
    pub fail_on_warnings: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        Ok(config)
    }

    /// Try to find and load ddlgate.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Ok(Some(Self::from_file(&config_path)?));
            }

            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(
        mut self,
        files: &[PathBuf],
        format: Option<OutputFormat>,
        optimization: Option<&str>,
        disable: &[String],
        fail_on_warnings: bool,
    ) -> Self {
        if !files.is_empty() {
            self.files = files.iter().map(|p| p.display().to_string()).collect();
        }

        if let Some(fmt) = format {
            self.format = Some(fmt.as_str().to_string());
        }

        if let Some(opt) = optimization {
            self.optimization = Some(opt.to_string());
        }

        if !disable.is_empty() {
            self.disable = disable.to_vec();
        }

        if fail_on_warnings {
            self.fail_on_warnings = true;
        }

        self
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match &self.format {
            Some(fmt) => fmt.parse().map_err(|e: String| miette::miette!(e)),
            None => Ok(OutputFormat::default()),
        }
    }

    pub fn optimization_type(&self) -> Result<OptimizationType> {
        match &self.optimization {
            Some(opt) => opt.parse().map_err(|e: String| miette::miette!(e)),
            None => Ok(OptimizationType::default()),
        }
    }

    /// Warning codes to drop from the report. Error codes and unknown names
    /// are ignored so that validity is never changed by configuration.
    pub fn disabled_warnings(&self) -> Vec<DetailCode> {
        let mut codes = Vec::new();
        for name in &self.disable {
            match DetailCode::from_wire(&name.to_uppercase()) {
                Some(code) if code.is_warning() => codes.push(code),
                Some(code) => {
                    tracing::warn!(%code, "only warnings can be disabled; ignoring");
                }
                None => {
                    tracing::warn!(code = %name, "unknown code in disable list; ignoring");
                }
            }
        }
        codes
    }
}
