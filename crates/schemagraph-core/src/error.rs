//! Error and diagnostic types

use serde::{Deserialize, Serialize};

/// Fatal errors that abort a transform with no partial output
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("failed to parse statement #{ordinal}: {message}")]
    #[diagnostic(
        code(schemagraph::parse),
        help("check the statement syntax for the selected --dialect")
    )]
    Parse {
        /// 1-based position of the statement in the input
        ordinal: usize,
        statement: String,
        message: String,
    },

    #[error("invalid length `{literal}` in column type `{descriptor}`")]
    #[diagnostic(code(schemagraph::invalid_length))]
    InvalidLength {
        descriptor: String,
        literal: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("cyclic schema: {}", path.join(" -> "))]
    #[diagnostic(
        code(schemagraph::cyclic_schema),
        help("interleave and foreign-key edges must not form a cycle")
    )]
    CyclicSchema { path: Vec<String> },

    #[error("tables `{first}` and `{second}` both map to key `{key}`")]
    #[diagnostic(code(schemagraph::duplicate_table))]
    DuplicateTable {
        key: String,
        first: String,
        second: String,
    },

    #[error("failed to serialize output")]
    #[diagnostic(code(schemagraph::serialize))]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// Non-fatal anomaly recorded while building the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(code = kind.code(), "{message}");
        Self {
            kind,
            severity: Severity::Warning,
            message,
            help: None,
        }
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::info!(code = kind.code(), "{message}");
        Self {
            kind,
            severity: Severity::Info,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Get the diagnostic code string (e.g., "W0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Types of diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// W0001: Key part names a column the table does not declare
    ColumnNotFound,
    /// W0002: Statement names a table that was not declared before it
    TableNotFound,
    /// W0003: Interleave parent is not part of the schema
    ParentNotFound,
    /// W0004: Statement kind is not modelled
    UnsupportedStatement,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::ColumnNotFound => "W0001",
            DiagnosticKind::TableNotFound => "W0002",
            DiagnosticKind::ParentNotFound => "W0003",
            DiagnosticKind::UnsupportedStatement => "W0004",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::ColumnNotFound => "column-not-found",
            DiagnosticKind::TableNotFound => "table-not-found",
            DiagnosticKind::ParentNotFound => "parent-not-found",
            DiagnosticKind::UnsupportedStatement => "unsupported-statement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_schema_message_lists_path() {
        let err = Error::CyclicSchema {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic schema: A -> B -> A");
    }

    #[test]
    fn test_diagnostic_codes() {
        let diag = Diagnostic::warning(DiagnosticKind::ParentNotFound, "missing parent");
        assert_eq!(diag.code(), "W0003");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.kind.name(), "parent-not-found");
    }
}
