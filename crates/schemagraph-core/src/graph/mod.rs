//! Relationship graph - interleave/foreign-key edges, descendant closure and
//! dependency ordering

mod closure;
mod order;
mod relations;

use crate::error::{Diagnostic, Result};
use crate::schema::Schema;

pub use closure::compute_descendants;
pub use order::{assign_dependency_order, dependency_cmp};
pub use relations::link_relationships;

/// Run every graph pass over a freshly built schema.
///
/// On return the tables are sorted by dependency order and every table
/// carries its children, referencing tables and descendant set.
pub fn resolve(schema: &mut Schema, diagnostics: &mut Vec<Diagnostic>) -> Result<()> {
    link_relationships(schema, diagnostics);
    compute_descendants(schema)?;
    assign_dependency_order(schema);
    Ok(())
}
