//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "schemagraph")]
#[command(author, version, about = "Turn SQL schema files into a dependency-ordered JSON model")]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Options of the default schema-to-JSON transform
#[derive(ClapArgs, Debug, Default)]
pub struct BuildArgs {
    /// Schema definition files, concatenated in order
    #[arg(short, long = "schema", value_name = "FILE")]
    pub schema: Vec<PathBuf>,

    /// Directory containing schema files
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Output file; `-` writes to stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<String>,

    /// SQL dialect
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Diagnostic output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (defaults to schemagraph.toml in this or a parent directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Display tables in dependency order
    Schema {
        /// Schema definition files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// SQL dialect
        #[arg(short, long, default_value = "mysql")]
        dialect: String,
    },

    /// Parse DDL and display the lowered statements (for debugging)
    Parse {
        /// SQL file to parse
        file: PathBuf,

        /// SQL dialect
        #[arg(short, long, default_value = "mysql")]
        dialect: String,
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
