//! Canonical schema model - tables, columns, keys and relationship edges

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::naming;
use crate::types::{SqlType, TargetType};

/// All tables of one input document, keyed by canonical table key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by canonical key
    pub fn get_table(&self, key: &str) -> Option<&Table> {
        self.tables.get(key)
    }

    /// Look up a table by the name it was declared with
    pub fn find_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.values().find(|t| t.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.values_mut().find(|t| t.name == name)
    }

    pub fn table_exists(&self, key: &str) -> bool {
        self.tables.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Table definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Canonical key, unique across the schema
    pub key: String,
    pub columns: IndexMap<String, Column>,
    pub primary_key: Vec<KeyPart>,
    pub interleave: Option<Interleave>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    /// Keys of tables interleaved in this one, sorted
    pub children: Vec<String>,
    /// Keys of tables holding a foreign key to this one, sorted and deduplicated
    pub ref_tables: Vec<String>,
    pub descendants: BTreeSet<String>,
    /// 1-based rank, assigned once the schema is sorted
    pub dependency_order: usize,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: naming::table_key(&name),
            name,
            columns: IndexMap::new(),
            primary_key: Vec::new(),
            interleave: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            children: Vec::new(),
            ref_tables: Vec::new(),
            descendants: BTreeSet::new(),
            dependency_order: 0,
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        // Case-insensitive lookup
        self.columns
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn column_exists(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Whether the table keyed `key` is transitively reachable from this one
    pub fn has_descendant(&self, key: &str) -> bool {
        self.descendants.contains(key)
    }
}

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub auto_increment: bool,
    /// Default literal exactly as written
    pub default: Option<String>,
    pub comment: Option<String>,
    pub target: TargetType,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        let target = TargetType::resolve(&sql_type, false);
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            auto_increment: false,
            default: None,
            comment: None,
            target,
        }
    }
}

/// One column reference inside a primary key, index or foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPart {
    pub column: String,
    /// Copy of the referenced column's target type; `None` when the column is missing
    pub target: Option<TargetType>,
}

impl KeyPart {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            target: None,
        }
    }
}

/// Index definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub columns: Vec<KeyPart>,
    pub unique: bool,
    pub null_filtered: bool,
    pub storing: Vec<String>,
    /// Table the index is interleaved in, if any
    pub interleave: Option<String>,
}

/// Physical co-location of a table under its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interleave {
    pub parent: String,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnDelete {
    #[default]
    NoAction,
    Cascade,
}

/// Foreign key constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub name: String,
    pub columns: Vec<KeyPart>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}
