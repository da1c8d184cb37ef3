//! schemagraph CLI - SQL schema to dependency-ordered JSON

mod args;
mod config;
mod output;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use schemagraph_core::ddl;
use schemagraph_core::{transform, SqlDialect, TransformOptions};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, BuildArgs, Command, OutputFormat};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(1)
        }
    }
}

/// Core anomalies are printed by the diagnostic formatter, so their log
/// lines only show up with `-v` or an explicit `RUST_LOG`.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if verbose > 0 {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,schemagraph_core=error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        None => build(&args.build, args.quiet),

        Some(Command::Schema { files, dialect }) => {
            let dialect = parse_dialect(&dialect)?;
            let sql = read_schema_files(&files)?;
            let result = transform(&sql, &TransformOptions { dialect })?;

            println!("Tables in dependency order:");
            println!("===========================");
            for table in result.schema.tables.values() {
                println!("\n{:>3}. {} ({})", table.dependency_order, table.key, table.name);
                for column in table.columns.values() {
                    let nullable = if column.not_null { "NOT NULL" } else { "NULL" };
                    println!(
                        "    - {} {} {} -> {}",
                        column.name, column.sql_type.base, nullable, column.target.full
                    );
                }
                if !table.children.is_empty() {
                    println!("    children: {}", table.children.join(", "));
                }
                if !table.ref_tables.is_empty() {
                    println!("    referenced by: {}", table.ref_tables.join(", "));
                }
            }

            if !args.quiet && !result.diagnostics.is_empty() {
                let name = files[0].display().to_string();
                OutputFormatter::new(OutputFormat::Human, name)
                    .print_diagnostics(&result.diagnostics);
            }
            Ok(())
        }

        Some(Command::Parse { file, dialect }) => {
            let dialect = parse_dialect(&dialect)?;
            let content = fs::read_to_string(&file).into_diagnostic()?;

            for (i, stmt) in ddl::parse_ddl(&content, dialect)?.iter().enumerate() {
                println!("Statement {}:", i + 1);
                println!("{:#?}", stmt);
                println!();
            }
            Ok(())
        }
    }
}

/// Default command: read schema files, transform, write JSON
fn build(build_args: &BuildArgs, quiet: bool) -> Result<()> {
    let config = match &build_args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::find_and_load()?.unwrap_or_default(),
    };
    let config = config.merge_with_args(build_args);

    let mut schema_files: Vec<PathBuf> = config.schema.iter().map(PathBuf::from).collect();
    if let Some(dir) = &config.schema_dir {
        let pattern = format!("{}/**/*.sql", dir);
        let mut found: Vec<PathBuf> = glob::glob(&pattern).into_diagnostic()?.flatten().collect();
        found.sort();
        schema_files.extend(found);
    }

    if schema_files.is_empty() {
        miette::bail!(
            "No schema files specified. Use --schema, --schema-dir, or configure in schemagraph.toml"
        );
    }

    let dialect = match &config.dialect {
        Some(name) => parse_dialect(name)?,
        None => SqlDialect::default(),
    };
    let format = match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Human,
    };

    let sql = read_schema_files(&schema_files)?;
    let result = transform(&sql, &TransformOptions { dialect })?;

    if !quiet && !result.diagnostics.is_empty() {
        let formatter = OutputFormatter::new(format, schema_files[0].display().to_string());
        formatter.print_diagnostics(&result.diagnostics);
        if format == OutputFormat::Human {
            eprintln!("{}", output::summary(&result.diagnostics));
        }
    }

    let json = result.to_json()?;
    match config.out.as_deref() {
        Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json).into_diagnostic()?;
            stdout.flush().into_diagnostic()?;
        }
        out => {
            let path = match out {
                Some(path) => PathBuf::from(path),
                None => default_output_path(&schema_files[0]),
            };
            fs::write(&path, &json).into_diagnostic()?;
            tracing::info!(
                path = %path.display(),
                tables = result.schema.len(),
                "wrote schema model"
            );
        }
    }

    Ok(())
}

fn parse_dialect(name: &str) -> Result<SqlDialect> {
    name.parse().map_err(|e: String| miette::miette!(e))
}

/// Concatenate schema files in the order given
fn read_schema_files(files: &[PathBuf]) -> Result<String> {
    let mut sql = String::new();
    for file in files {
        let content = fs::read_to_string(file)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("failed to read {}", file.display())))?;
        sql.push_str(&content);
        sql.push('\n');
    }
    Ok(sql)
}

/// `schema.sql` becomes `schema.json`; a path without `.sql` gets `.json` appended
fn default_output_path(schema: &Path) -> PathBuf {
    let path = schema.display().to_string();
    if path.contains(".sql") {
        PathBuf::from(path.replacen(".sql", ".json", 1))
    } else {
        PathBuf::from(format!("{path}.json"))
    }
}
