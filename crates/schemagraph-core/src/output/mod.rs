//! JSON projection of the finished schema
//!
//! Views are built from the canonical model right before encoding; every
//! derived name comes from [`Names::derive`] at that point, so projecting the
//! same schema twice yields identical documents.

use serde::Serialize;

use crate::error::Result;
use crate::naming::Names;
use crate::schema::{Column, Index, Interleave, KeyPart, OnDelete, Schema, Table};

const DOCUMENT_KIND: &str = "sql";

/// Top-level output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub kind: &'static str,
    #[serde(rename = "srcKind")]
    pub src_kind: &'static str,
    /// Tables in dependency order
    pub data: Vec<TableView>,
}

impl Document {
    /// Project a sorted schema. Tables keep the schema's iteration order.
    pub fn project(schema: &Schema) -> Self {
        Self {
            kind: DOCUMENT_KIND,
            src_kind: DOCUMENT_KIND,
            data: schema.tables.values().map(TableView::from).collect(),
        }
    }

    /// Encode as pretty-printed JSON with tab indentation
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    #[serde(rename = "namesDb")]
    pub names_db: String,
    #[serde(rename = "nameDb")]
    pub name_db: String,
    #[serde(rename = "Name")]
    pub camel: String,
    #[serde(rename = "name")]
    pub lower_camel: String,
    #[serde(rename = "Names")]
    pub camel_plural: String,
    #[serde(rename = "names")]
    pub lower_camel_plural: String,
    #[serde(rename = "n")]
    pub short: String,
    pub key: String,
    pub fields: Vec<FieldView>,
    #[serde(rename = "primaryKey")]
    pub primary_key: Vec<KeyPartView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interleave: Option<InterleaveView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(rename = "refTables", skip_serializing_if = "Vec::is_empty")]
    pub ref_tables: Vec<String>,
    #[serde(rename = "dependencyOrder")]
    pub dependency_order: usize,
}

impl From<&Table> for TableView {
    fn from(table: &Table) -> Self {
        let names = Names::derive(&table.name);
        Self {
            names_db: names.raw,
            name_db: names.singular,
            camel: names.camel,
            lower_camel: names.lower_camel,
            camel_plural: names.camel_plural,
            lower_camel_plural: names.lower_camel_plural,
            short: names.short,
            key: table.key.clone(),
            fields: table.columns.values().map(FieldView::from).collect(),
            primary_key: table.primary_key.iter().map(KeyPartView::from).collect(),
            interleave: table.interleave.as_ref().map(InterleaveView::from),
            indexes: table.indexes.iter().map(IndexView::from).collect(),
            children: table.children.clone(),
            ref_tables: table.ref_tables.clone(),
            dependency_order: table.dependency_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    #[serde(rename = "namesDb")]
    pub names_db: String,
    #[serde(rename = "nameDb")]
    pub name_db: String,
    #[serde(rename = "nameJson")]
    pub name_json: String,
    #[serde(rename = "Name")]
    pub camel: String,
    #[serde(rename = "name")]
    pub lower_camel: String,
    #[serde(rename = "Names")]
    pub camel_plural: String,
    #[serde(rename = "names")]
    pub lower_camel_plural: String,
    #[serde(rename = "nameExact")]
    pub name_exact: String,
    #[serde(rename = "Type")]
    pub target_type: String,
    #[serde(rename = "baseType")]
    pub base_type: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub size: u64,
    #[serde(rename = "isArray")]
    pub is_array: bool,
    #[serde(rename = "notNull")]
    pub not_null: bool,
    #[serde(rename = "autoIncrement", skip_serializing_if = "is_false")]
    pub auto_increment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub key: String,
}

impl From<&Column> for FieldView {
    fn from(column: &Column) -> Self {
        let names = Names::derive(&column.name);
        Self {
            name_exact: names.raw.clone(),
            names_db: names.raw,
            name_db: names.singular,
            key: names.json.clone(),
            name_json: names.json,
            camel: names.camel,
            lower_camel: names.lower_camel,
            camel_plural: names.camel_plural,
            lower_camel_plural: names.lower_camel_plural,
            target_type: column.target.full.clone(),
            base_type: column.target.base.clone(),
            size: column.sql_type.len,
            is_array: column.sql_type.array,
            not_null: column.not_null,
            auto_increment: column.auto_increment,
            default: column.default.clone().filter(|d| !d.is_empty()),
            comment: column.comment.clone().filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPartView {
    #[serde(rename = "namesDb")]
    pub names_db: String,
    #[serde(rename = "nameDb")]
    pub name_db: String,
    #[serde(rename = "Name")]
    pub camel: String,
    #[serde(rename = "name")]
    pub lower_camel: String,
    #[serde(rename = "Names")]
    pub camel_plural: String,
    #[serde(rename = "names")]
    pub lower_camel_plural: String,
    /// Bare scalar of the referenced column
    #[serde(rename = "Type")]
    pub target_type: String,
    #[serde(rename = "baseType")]
    pub base_type: String,
}

impl From<&KeyPart> for KeyPartView {
    fn from(part: &KeyPart) -> Self {
        let names = Names::derive(&part.column);
        let (target_type, base_type) = part
            .target
            .as_ref()
            .map(|t| (t.scalar.clone(), t.base.clone()))
            .unwrap_or_default();
        Self {
            names_db: names.raw,
            name_db: names.singular,
            camel: names.camel,
            lower_camel: names.lower_camel,
            camel_plural: names.camel_plural,
            lower_camel_plural: names.lower_camel_plural,
            target_type,
            base_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexView {
    pub name: String,
    pub table: String,
    pub fields: Vec<KeyPartView>,
    pub unique: bool,
    #[serde(rename = "nullFiltered", skip_serializing_if = "is_false")]
    pub null_filtered: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub storing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interleave: Option<String>,
}

impl From<&Index> for IndexView {
    fn from(index: &Index) -> Self {
        Self {
            name: index.name.clone(),
            table: index.table.clone(),
            fields: index.columns.iter().map(KeyPartView::from).collect(),
            unique: index.unique,
            null_filtered: index.null_filtered,
            storing: index.storing.clone(),
            interleave: index.interleave.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterleaveView {
    pub parent: String,
    #[serde(rename = "onDelete")]
    pub on_delete: OnDelete,
}

impl From<&Interleave> for InterleaveView {
    fn from(interleave: &Interleave) -> Self {
        Self {
            parent: interleave.parent.clone(),
            on_delete: interleave.on_delete,
        }
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}
