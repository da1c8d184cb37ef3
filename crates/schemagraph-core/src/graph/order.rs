//! Dependency ordering

use std::cmp::Ordering;

use crate::schema::{Schema, Table};

/// Order two tables so that a descendant sorts before the table it descends from.
///
/// Unrelated tables are ordered by descendant count, then by key.
pub fn dependency_cmp(a: &Table, b: &Table) -> Ordering {
    let a_under_b = b.has_descendant(&a.key);
    let b_under_a = a.has_descendant(&b.key);
    match (a_under_b, b_under_a) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .descendants
            .len()
            .cmp(&b.descendants.len())
            .then_with(|| a.key.cmp(&b.key)),
    }
}

/// Stable-sort the schema's tables with [`dependency_cmp`] and number them `1..=N`.
pub fn assign_dependency_order(schema: &mut Schema) {
    schema.tables.sort_by(|_, a, _, b| dependency_cmp(a, b));
    for (i, table) in schema.tables.values_mut().enumerate() {
        table.dependency_order = i + 1;
    }
}
