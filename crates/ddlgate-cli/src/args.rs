//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ddlgate")]
#[command(author, version, about = "CREATE TABLE schema validator")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate schema files
    Check {
        /// Schema files to check (supports glob patterns)
        files: Vec<PathBuf>,

        /// Optimization type recorded with the result
        #[arg(short, long, value_name = "TYPE")]
        optimization: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Configuration file (defaults to ddlgate.toml in this or a parent directory)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Warning codes to suppress (e.g. NO_PRIMARY_KEY)
        #[arg(long, value_name = "CODE")]
        disable: Vec<String>,

        /// Exit with status 1 when warnings remain
        #[arg(long)]
        fail_on_warnings: bool,
    },

    /// Display the tables and columns extracted from schema files
    Tables {
        /// Schema files (supports glob patterns)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Run one conversion in process and print the stored record
    Convert {
        /// Schema file to convert
        file: PathBuf,

        /// Optimization type
        #[arg(short, long, value_name = "TYPE")]
        optimization: Option<String>,
    },

    /// Parse each CREATE TABLE statement and display the AST (for debugging)
    Parse {
        /// Schema file to parse
        file: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}. Use human or json", s)),
        }
    }
}
