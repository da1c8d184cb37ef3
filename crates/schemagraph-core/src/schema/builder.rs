//! Schema builder - converts lowered DDL statements to the canonical model

use crate::ddl::{
    self, ColumnOptionKind, ConstraintKind, RawColumn, RawConstraint, RawIndex, RawStatement,
    RawTable,
};
use crate::dialect::SqlDialect;
use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::schema::{Column, ForeignKeyConstraint, Index, KeyPart, Schema, Table};
use crate::types::{SqlType, TargetType};

/// Builder for constructing a Schema from SQL DDL
pub struct SchemaBuilder {
    dialect: SqlDialect,
    schema: Schema,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::with_dialect(SqlDialect::default())
    }

    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            schema: Schema::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse SQL schema definitions and add their tables to the schema
    pub fn parse(&mut self, sql: &str) -> Result<()> {
        for stmt in ddl::parse_ddl(sql, self.dialect)? {
            self.process_statement(stmt)?;
        }
        Ok(())
    }

    /// Process a single lowered statement
    pub fn process_statement(&mut self, stmt: RawStatement) -> Result<()> {
        match stmt {
            RawStatement::CreateTable(raw) => self.process_create_table(raw)?,
            RawStatement::CreateIndex(raw) => self.process_create_index(raw),
            RawStatement::Alter => {
                tracing::debug!("ignoring ALTER statement");
            }
            RawStatement::Unsupported(kind) => {
                self.diagnostics.push(Diagnostic::info(
                    DiagnosticKind::UnsupportedStatement,
                    format!("ignoring unsupported statement: {kind}"),
                ));
            }
        }
        Ok(())
    }

    /// Process CREATE TABLE statement
    fn process_create_table(&mut self, raw: RawTable) -> Result<()> {
        let mut table = Table::new(&raw.name);
        table.interleave = raw.interleave;

        let mut inline_keys = Vec::new();
        for raw_column in &raw.columns {
            let column = build_column(raw_column)?;
            inline_keys.extend(inline_constraints(raw_column));
            table.columns.insert(column.name.clone(), column);
        }

        // Inline column constraints first so a table-level declaration wins
        for constraint in inline_keys.iter().chain(&raw.constraints) {
            self.process_constraint(&mut table, constraint);
        }

        if let Some(existing) = self.schema.get_table(&table.key) {
            return Err(Error::DuplicateTable {
                key: table.key,
                first: existing.name.clone(),
                second: table.name,
            });
        }

        tracing::debug!(table = %table.name, key = %table.key, "added table");
        self.schema.tables.insert(table.key.clone(), table);
        Ok(())
    }

    /// Distribute a table constraint by its kind
    fn process_constraint(&mut self, table: &mut Table, constraint: &RawConstraint) {
        let columns = resolve_key_parts(table, &constraint.keys, &mut self.diagnostics);
        match constraint.kind {
            ConstraintKind::PrimaryKey => {
                table.primary_key = columns;
            }
            ConstraintKind::Index | ConstraintKind::UniqueIndex => {
                table.indexes.push(Index {
                    name: constraint.name.clone(),
                    table: table.name.clone(),
                    columns,
                    unique: constraint.kind == ConstraintKind::UniqueIndex,
                    null_filtered: false,
                    storing: Vec::new(),
                    interleave: None,
                });
            }
            ConstraintKind::ForeignKey => {
                table.foreign_keys.push(ForeignKeyConstraint {
                    name: constraint.name.clone(),
                    columns,
                    referenced_table: constraint.referenced_table.clone().unwrap_or_default(),
                    referenced_columns: constraint.referenced_columns.clone(),
                });
            }
        }
    }

    /// Process CREATE INDEX statement
    fn process_create_index(&mut self, raw: RawIndex) {
        let Some(table) = self.schema.find_by_name_mut(&raw.table) else {
            self.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::TableNotFound,
                    format!(
                        "index '{}' references table '{}' which was not found in schema",
                        raw.name, raw.table
                    ),
                )
                .with_help("Ensure the CREATE TABLE statement appears before CREATE INDEX"),
            );
            return;
        };

        let columns = resolve_key_parts(table, &raw.keys, &mut self.diagnostics);
        table.indexes.push(Index {
            name: raw.name,
            table: table.name.clone(),
            columns,
            unique: raw.unique,
            null_filtered: raw.null_filtered,
            storing: raw.storing,
            interleave: raw.interleave,
        });
    }

    /// Consume the builder and return the schema
    pub fn build(self) -> (Schema, Vec<Diagnostic>) {
        (self.schema, self.diagnostics)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a column from its raw declaration
fn build_column(raw: &RawColumn) -> Result<Column> {
    let sql_type = SqlType::parse(&raw.type_descriptor, raw.is_array)?;
    let mut column = Column::new(&raw.name, sql_type);

    for option in &raw.options {
        match option {
            ColumnOptionKind::NotNull => column.not_null = true,
            ColumnOptionKind::AutoIncrement => column.auto_increment = true,
            ColumnOptionKind::Default(value) => column.default = Some(value.clone()),
            ColumnOptionKind::Comment(text) => column.comment = Some(text.clone()),
            ColumnOptionKind::PrimaryKey | ColumnOptionKind::References { .. } => {}
        }
    }

    column.target = TargetType::resolve(&column.sql_type, column.not_null);
    Ok(column)
}

/// Back-fill key parts with the target type of the column they name.
///
/// A key naming a missing column is reported and left without a type.
fn resolve_key_parts(
    table: &Table,
    keys: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<KeyPart> {
    keys.iter()
        .map(|name| {
            let mut part = KeyPart::new(name);
            match table.get_column(name) {
                Some(column) => part.target = Some(column.target.clone()),
                None => diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::ColumnNotFound,
                    format!("key column '{}' not found in table '{}'", name, table.name),
                )),
            }
            part
        })
        .collect()
}

/// Constraints declared inline on a column (`PRIMARY KEY`, `REFERENCES t(c)`)
fn inline_constraints(raw: &RawColumn) -> impl Iterator<Item = RawConstraint> + '_ {
    raw.options.iter().filter_map(move |option| {
        let (kind, referenced_table, referenced_columns) = match option {
            ColumnOptionKind::PrimaryKey => (ConstraintKind::PrimaryKey, None, Vec::new()),
            ColumnOptionKind::References { table, columns } => {
                (ConstraintKind::ForeignKey, Some(table.clone()), columns.clone())
            }
            _ => return None,
        };
        Some(RawConstraint {
            kind,
            name: String::new(),
            keys: vec![raw.name.clone()],
            referenced_table,
            referenced_columns,
        })
    })
}
