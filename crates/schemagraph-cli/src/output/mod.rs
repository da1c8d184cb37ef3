//! Output formatting

use schemagraph_core::{Diagnostic, Severity};

use crate::args::OutputFormat;

/// Output formatter for diagnostics
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print diagnostics to stderr in the configured format
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        match self.format {
            OutputFormat::Human => self.print_human(diagnostics),
            OutputFormat::Json => self.print_json(diagnostics),
        }
    }

    fn print_human(&self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            let severity_str = match diag.severity {
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };

            eprintln!("{}[{}]: {}", severity_str, diag.code(), diag.message);
            eprintln!("  --> {}", self.file_name);

            if let Some(help) = &diag.help {
                eprintln!("   = help: {}", help);
            }

            eprintln!();
        }
    }

    fn print_json(&self, diagnostics: &[Diagnostic]) {
        let output = serde_json::json!({
            "file": self.file_name,
            "diagnostics": diagnostics
                .iter()
                .map(|d| serde_json::json!({
                    "code": d.code(),
                    "kind": d.kind.name(),
                    "severity": d.severity,
                    "message": d.message,
                    "help": d.help,
                }))
                .collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => tracing::error!("failed to encode diagnostics: {e}"),
        }
    }
}

/// One-line count summary, e.g. `2 warning(s), 1 note(s)`
pub fn summary(diagnostics: &[Diagnostic]) -> String {
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    let notes = diagnostics.len() - warnings;
    format!("{warnings} warning(s), {notes} note(s)")
}
