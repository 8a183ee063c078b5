//! Output formatting

use ddlgate_core::{OptimizationType, Severity, ValidationDetail, ValidationResult};

use crate::args::OutputFormat;

/// Output formatter for validation results
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self {
            format,
            file_name,
            quiet: false,
        }
    }

    /// Only print errors and warnings, no table summary
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Print a validation result in the configured format
    pub fn print_result(
        &self,
        result: &ValidationResult,
        optimization: OptimizationType,
    ) -> miette::Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human(result);
                Ok(())
            }
            OutputFormat::Json => self.print_json(result, optimization),
        }
    }

    fn print_human(&self, result: &ValidationResult) {
        for detail in result.errors.iter().chain(&result.warnings) {
            self.print_detail(detail);
        }

        if self.quiet {
            return;
        }

        let status = if result.is_valid {
            "\x1b[32mvalid\x1b[0m"
        } else {
            "\x1b[31minvalid\x1b[0m"
        };
        eprintln!(
            "{}: {} ({} table(s))",
            self.file_name,
            status,
            result.tables.len()
        );
        for table in &result.tables {
            let pk = if table.has_primary_key {
                ", primary key"
            } else {
                ""
            };
            eprintln!(
                "  - {} ({} column(s){})",
                table.name,
                table.columns.len(),
                pk
            );
        }
    }

    fn print_detail(&self, detail: &ValidationDetail) {
        let severity_str = match detail.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        eprintln!("{}[{}]: {}", severity_str, detail.code, detail.message);
        eprintln!("  --> {}", self.file_name);

        match (&detail.table, &detail.column) {
            (Some(table), Some(column)) => eprintln!("   = in: {}.{}", table, column),
            (Some(table), None) => eprintln!("   = in: {}", table),
            _ => {}
        }

        eprintln!();
    }

    fn print_json(
        &self,
        result: &ValidationResult,
        optimization: OptimizationType,
    ) -> miette::Result<()> {
        let output = serde_json::json!({
            "file": self.file_name,
            "optimizationType": optimization,
            "result": result
        });
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| miette::miette!("failed to serialize result: {}", e))?;
        println!("{}", text);
        Ok(())
    }
}

/// Drop warnings whose code is in `disabled`
pub fn without_warnings(
    mut result: ValidationResult,
    disabled: &[ddlgate_core::DetailCode],
) -> ValidationResult {
    result.warnings.retain(|w| !disabled.contains(&w.code));
    result
}
