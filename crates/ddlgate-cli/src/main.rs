//! ddlgate CLI - CREATE TABLE schema validator

mod args;
mod config;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ddlgate_core::conversion::{
    ConversionService, ConversionWorker, InMemoryQueue, InMemoryRecordStore, RecordStore,
    StaticDesignGenerator,
};
use ddlgate_core::parser::{extract_statements, extract_table_name};
use ddlgate_core::types::type_category;
use ddlgate_core::{validate_schema, OptimizationType, Severity};
use miette::{IntoDiagnostic, Result};
use tracing::Level;

use crate::args::{Args, Command};
use crate::config::Config;
use crate::output::{without_warnings, OutputFormatter};

fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn run(args: Args) -> Result<bool> {
    let quiet = args.quiet;

    match args.command {
        Command::Check {
            files,
            optimization,
            format,
            config: config_path,
            disable,
            fail_on_warnings,
        } => {
            let config = match config_path {
                Some(path) => Config::from_file(&path)?,
                None => Config::find_and_load()?.unwrap_or_default(),
            };

            // CLI takes precedence
            let config = config.merge_with_args(
                &files,
                format,
                optimization.as_deref(),
                &disable,
                fail_on_warnings,
            );

            let output_format = config.output_format()?;
            let optimization = config.optimization_type()?;
            let disabled = config.disabled_warnings();

            let schema_files = expand_files(&config.files)?;
            if schema_files.is_empty() {
                miette::bail!(
                    "No schema files specified. Use positional arguments or configure in ddlgate.toml"
                );
            }

            let mut total_errors = 0;
            let mut total_warnings = 0;
            let mut invalid_files = 0;

            for schema_file in &schema_files {
                let content = fs::read_to_string(schema_file).into_diagnostic()?;
                let result = without_warnings(validate_schema(&content), &disabled);

                OutputFormatter::new(output_format, schema_file.display().to_string())
                    .quiet(quiet)
                    .print_result(&result, optimization)?;

                for detail in result.errors.iter().chain(&result.warnings) {
                    match detail.severity {
                        Severity::Error => total_errors += 1,
                        Severity::Warning => total_warnings += 1,
                    }
                }
                if !result.is_valid {
                    invalid_files += 1;
                }
            }

            if !quiet {
                eprintln!();
                if total_errors > 0 || total_warnings > 0 {
                    eprintln!(
                        "Found {} error(s), {} warning(s) in {} file(s)",
                        total_errors,
                        total_warnings,
                        schema_files.len()
                    );
                } else {
                    eprintln!("All {} file(s) passed validation", schema_files.len());
                }
            }

            Ok(invalid_files > 0 || (config.fail_on_warnings && total_warnings > 0))
        }

        Command::Tables { files } => {
            let patterns: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            let schema_files = expand_files(&patterns)?;
            if schema_files.is_empty() {
                miette::bail!("No schema files matched");
            }

            let mut has_errors = false;
            for schema_file in &schema_files {
                let content = fs::read_to_string(schema_file).into_diagnostic()?;
                let result = validate_schema(&content);
                has_errors |= !result.is_valid;

                println!("{}:", schema_file.display());
                for table in &result.tables {
                    let pk = if table.has_primary_key {
                        ""
                    } else {
                        " (no primary key)"
                    };
                    println!("  Table: {}{}", table.name, pk);
                    for col in &table.columns {
                        let marker = if col.raw.to_uppercase().contains("PRIMARY KEY") {
                            " PK"
                        } else {
                            ""
                        };
                        match type_category(&col.data_type) {
                            Some(category) => println!(
                                "    - {} {} [{}]{}",
                                col.name, col.data_type, category, marker
                            ),
                            None => println!("    - {} {}{}", col.name, col.data_type, marker),
                        }
                    }
                }
                if result.tables.is_empty() {
                    println!("  (no tables)");
                }
            }

            Ok(has_errors)
        }

        Command::Convert { file, optimization } => {
            let content = fs::read_to_string(&file).into_diagnostic()?;
            let optimization: OptimizationType = match optimization {
                Some(opt) => opt.parse().map_err(|e: String| miette::miette!(e))?,
                None => OptimizationType::default(),
            };

            let body = serde_json::json!({
                "sqlContent": content,
                "optimizationType": optimization,
            })
            .to_string();

            let store = InMemoryRecordStore::new();
            let queue = InMemoryQueue::new();
            let generator = StaticDesignGenerator::default();

            let accepted = match ConversionService::new(&store, &queue).submit(&body) {
                Ok(accepted) => accepted,
                Err(e) => {
                    print_json(&e.to_response())?;
                    return Ok(true);
                }
            };

            let worker = ConversionWorker::new(&store, &generator);
            while let Some(message) = queue.pop().into_diagnostic()? {
                if let Err(e) = worker.process_message(&message) {
                    tracing::warn!(conversion_id = %message.conversion_id, error = %e, "conversion failed; dead-lettering");
                    let body = serde_json::to_string(&message).into_diagnostic()?;
                    worker.process_dead_letter(&body).into_diagnostic()?;
                }
            }

            let record = store
                .get(&accepted.conversion_id)
                .into_diagnostic()?
                .ok_or_else(|| miette::miette!("conversion {} disappeared", accepted.conversion_id))?;
            print_json(&record)?;

            Ok(false)
        }

        Command::Parse { file } => {
            // Parse and display AST (for debugging)
            let content = fs::read_to_string(&file).into_diagnostic()?;

            use sqlparser::dialect::PostgreSqlDialect;
            use sqlparser::parser::Parser;

            let statements = extract_statements(&content);
            if statements.is_empty() {
                eprintln!("No CREATE TABLE statements found");
                return Ok(true);
            }

            let mut has_errors = false;
            for (i, stmt) in statements.iter().enumerate() {
                let name = extract_table_name(stmt).unwrap_or_else(|| "?".to_string());
                println!("Statement {} (table {}):", i + 1, name);

                match Parser::parse_sql(&PostgreSqlDialect {}, stmt) {
                    Ok(ast) => {
                        for node in &ast {
                            println!("{:#?}", node);
                        }
                    }
                    Err(e) => {
                        has_errors = true;
                        println!("Parse error: {}", e);
                    }
                }

                let result = validate_schema(stmt);
                for table in &result.tables {
                    let columns: Vec<String> = table
                        .columns
                        .iter()
                        .map(|c| format!("{} {}", c.name, c.data_type))
                        .collect();
                    println!("Extracted: {} ({})", table.name, columns.join(", "));
                }
                for detail in &result.errors {
                    println!("Extraction error [{}]: {}", detail.code, detail.message);
                }
                println!();
            }

            Ok(has_errors)
        }
    }
}

/// Expand glob patterns; plain paths are kept as given
fn expand_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if pattern.contains(['*', '?', '[']) {
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                files.push(path);
            }
        } else {
            files.push(PathBuf::from(pattern));
        }
    }
    Ok(files)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", text);
    Ok(())
}
