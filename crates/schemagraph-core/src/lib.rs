//! schemagraph-core: SQL DDL to dependency-ordered JSON
//!
//! This library reads `CREATE`/`ALTER` statements, builds a canonical table
//! model, links tables through interleave and foreign-key edges, sorts them
//! so that dependents come first, and projects the result to JSON.

pub mod ddl;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod naming;
pub mod output;
pub mod schema;
pub mod transform;
pub mod types;

pub use dialect::SqlDialect;
pub use error::{Diagnostic, DiagnosticKind, Error, Result, Severity};
pub use output::Document;
pub use schema::{Schema, SchemaBuilder, Table};
pub use transform::{transform, TransformOptions, Transformed};
pub use types::{SqlType, TargetType};
