//! Children and referencing-table edges

use std::collections::{BTreeSet, HashMap};

use crate::error::{Diagnostic, DiagnosticKind};
use crate::naming;
use crate::schema::Schema;

/// Populate `children` and `ref_tables` on every table.
///
/// A table interleaved in a parent becomes one of the parent's children. A
/// table holding a foreign key becomes a referencing table of the table it
/// points at, once however many foreign keys it declares against that table.
/// Both lists end up sorted.
pub fn link_relationships(schema: &mut Schema, diagnostics: &mut Vec<Diagnostic>) {
    let keys_by_name: HashMap<&str, &str> = schema
        .tables
        .values()
        .map(|t| (t.name.as_str(), t.key.as_str()))
        .collect();
    let resolve_key = |name: &str| -> Option<String> {
        if let Some(key) = keys_by_name.get(name) {
            return Some((*key).to_string());
        }
        let key = naming::table_key(name);
        schema.table_exists(&key).then_some(key)
    };

    // (target, source): source is pushed onto target's list
    let mut child_edges: Vec<(String, String)> = Vec::new();
    let mut ref_edges: Vec<(String, String)> = Vec::new();
    let mut linked_pairs: BTreeSet<(String, String)> = BTreeSet::new();

    for table in schema.tables.values() {
        if let Some(interleave) = &table.interleave {
            match resolve_key(&interleave.parent) {
                Some(parent) => child_edges.push((parent, table.key.clone())),
                None => diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::ParentNotFound,
                        format!(
                            "table '{}' is interleaved in '{}' which was not found in schema",
                            table.name, interleave.parent
                        ),
                    )
                    .with_help("Declare the parent table in the same schema input"),
                ),
            }
        }

        for fk in &table.foreign_keys {
            let Some(referenced) = resolve_key(&fk.referenced_table) else {
                tracing::debug!(
                    table = %table.name,
                    referenced = %fk.referenced_table,
                    "skipping foreign key to unknown table"
                );
                continue;
            };
            if referenced == table.key {
                tracing::debug!(table = %table.name, "skipping self-referencing foreign key");
                continue;
            }

            if linked_pairs.insert((referenced.clone(), table.key.clone())) {
                ref_edges.push((referenced, table.key.clone()));
            }
        }
    }

    for (parent, child) in child_edges {
        if let Some(table) = schema.tables.get_mut(&parent) {
            table.children.push(child);
        }
    }
    for (referenced, owner) in ref_edges {
        if let Some(table) = schema.tables.get_mut(&referenced) {
            table.ref_tables.push(owner);
        }
    }

    for table in schema.tables.values_mut() {
        table.children.sort();
        table.ref_tables.sort();
    }
}
