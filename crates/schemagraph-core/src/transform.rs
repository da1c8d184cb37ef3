//! End-to-end DDL to JSON pipeline

use crate::dialect::SqlDialect;
use crate::error::{Diagnostic, Result};
use crate::graph;
use crate::output::Document;
use crate::schema::{Schema, SchemaBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub dialect: SqlDialect,
}

/// Result of a successful transform
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Tables sorted by dependency order
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

impl Transformed {
    pub fn document(&self) -> Document {
        Document::project(&self.schema)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        self.document().to_json_vec()
    }
}

/// Parse `sql`, build the schema, link and order its tables.
///
/// Any fatal error aborts the run; anomalies are returned alongside the schema.
pub fn transform(sql: &str, options: &TransformOptions) -> Result<Transformed> {
    let mut builder = SchemaBuilder::with_dialect(options.dialect);
    builder.parse(sql)?;
    let (mut schema, mut diagnostics) = builder.build();

    graph::resolve(&mut schema, &mut diagnostics)?;
    tracing::debug!(
        tables = schema.len(),
        diagnostics = diagnostics.len(),
        "transform complete"
    );

    Ok(Transformed {
        schema,
        diagnostics,
    })
}
