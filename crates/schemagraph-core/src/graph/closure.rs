//! Transitive descendant closure

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Fill every table's `descendants` with all tables reachable through
/// `children` and `ref_tables` edges.
///
/// Fails with [`Error::CyclicSchema`] when the edges form a cycle.
pub fn compute_descendants(schema: &mut Schema) -> Result<()> {
    let edges: BTreeMap<String, Vec<String>> = schema
        .tables
        .values()
        .map(|t| {
            let next = t.children.iter().chain(&t.ref_tables).cloned().collect();
            (t.key.clone(), next)
        })
        .collect();

    let mut closure = Closure {
        edges: &edges,
        state: HashMap::new(),
        descendants: HashMap::new(),
        path: Vec::new(),
    };
    for key in edges.keys() {
        closure.visit(key)?;
    }

    let mut descendants = closure.descendants;
    for table in schema.tables.values_mut() {
        table.descendants = descendants.remove(&table.key).unwrap_or_default();
    }
    Ok(())
}

struct Closure<'a> {
    edges: &'a BTreeMap<String, Vec<String>>,
    state: HashMap<String, VisitState>,
    descendants: HashMap<String, BTreeSet<String>>,
    /// Keys on the current DFS stack, outermost first
    path: Vec<String>,
}

impl Closure<'_> {
    fn visit(&mut self, key: &str) -> Result<()> {
        match self.state.get(key) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::InProgress) => {
                let start = self.path.iter().position(|k| k == key).unwrap_or(0);
                let mut path = self.path[start..].to_vec();
                path.push(key.to_string());
                return Err(Error::CyclicSchema { path });
            }
            None => {}
        }

        self.state.insert(key.to_string(), VisitState::InProgress);
        self.path.push(key.to_string());

        let edges = self.edges;
        let mut reachable = BTreeSet::new();
        for next in edges.get(key).into_iter().flatten() {
            self.visit(next)?;
            reachable.insert(next.clone());
            if let Some(nested) = self.descendants.get(next) {
                reachable.extend(nested.iter().cloned());
            }
        }

        self.path.pop();
        self.state.insert(key.to_string(), VisitState::Done);
        self.descendants.insert(key.to_string(), reachable);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;
    use pretty_assertions::assert_eq;

    fn schema(edges: Vec<(&str, Vec<&str>)>) -> Schema {
        let mut schema = Schema::new();
        for (name, children) in edges {
            let mut table = Table::new(name);
            table.children = children.iter().map(|c| c.to_string()).collect();
            schema.tables.insert(table.key.clone(), table);
        }
        schema
    }

    fn keys(schema: &Schema, key: &str) -> Vec<String> {
        schema.get_table(key).unwrap().descendants.iter().cloned().collect()
    }

    #[test]
    fn test_closure_is_transitive() {
        let mut schema = schema(vec![
            ("A", vec!["B"]),
            ("B", vec!["C", "D"]),
            ("C", vec![]),
            ("D", vec!["C"]),
        ]);
        compute_descendants(&mut schema).unwrap();

        assert_eq!(keys(&schema, "A"), vec!["B", "C", "D"]);
        assert_eq!(keys(&schema, "B"), vec!["C", "D"]);
        assert_eq!(keys(&schema, "D"), vec!["C"]);
        assert!(keys(&schema, "C").is_empty());
    }

    #[test]
    fn test_closure_follows_referencing_tables() {
        let mut schema = schema(vec![("Customer", vec![]), ("Order", vec![]), ("Item", vec![])]);
        schema.tables.get_mut("Customer").unwrap().ref_tables = vec!["Order".to_string()];
        schema.tables.get_mut("Order").unwrap().ref_tables = vec!["Item".to_string()];
        compute_descendants(&mut schema).unwrap();

        assert_eq!(keys(&schema, "Customer"), vec!["Item", "Order"]);
    }

    #[test]
    fn test_cycle_is_reported_with_path() {
        let mut schema = schema(vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])]);
        let err = compute_descendants(&mut schema).unwrap_err();
        match err {
            Error::CyclicSchema { path } => assert_eq!(path, vec!["A", "B", "C", "A"]),
            other => panic!("expected cyclic schema error, got {other:?}"),
        }
    }
}
