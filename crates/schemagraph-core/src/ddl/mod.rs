//! DDL front end - splits schema text, parses it with sqlparser and lowers
//! each statement to the small set of shapes the schema builder consumes

mod extensions;
mod split;

use sqlparser::ast::{
    ArrayElemTypeDef, ColumnOption, DataType, Expr, Ident, ObjectName, Statement, TableConstraint,
};
use sqlparser::parser::Parser;

use crate::dialect::SqlDialect;
use crate::error::{Error, Result};
use crate::schema::Interleave;

pub use extensions::{
    extract_index_extensions, extract_table_extensions, IndexExtensions, TableExtensions,
};
pub use split::split_statements;

/// A parsed statement, reduced to what the schema builder models
#[derive(Debug, Clone, PartialEq)]
pub enum RawStatement {
    CreateTable(RawTable),
    CreateIndex(RawIndex),
    /// Any `ALTER ...`; accepted and ignored
    Alter,
    /// Anything else, with a short label such as `CREATE VIEW`
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<RawColumn>,
    pub constraints: Vec<RawConstraint>,
    pub interleave: Option<Interleave>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    /// Data type as rendered by the parser, e.g. `VARCHAR(255)`; element type for arrays
    pub type_descriptor: String,
    pub is_array: bool,
    pub options: Vec<ColumnOptionKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOptionKind {
    NotNull,
    AutoIncrement,
    Default(String),
    Comment(String),
    PrimaryKey,
    References { table: String, columns: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Index,
    UniqueIndex,
    ForeignKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawConstraint {
    pub kind: ConstraintKind,
    pub name: String,
    pub keys: Vec<String>,
    pub referenced_table: Option<String>,
    pub referenced_columns: Vec<String>,
}

impl RawConstraint {
    fn new(kind: ConstraintKind, name: Option<&Ident>, keys: &[Ident]) -> Self {
        Self {
            kind,
            name: name.map(|n| n.value.clone()).unwrap_or_default(),
            keys: idents(keys),
            referenced_table: None,
            referenced_columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawIndex {
    pub name: String,
    pub table: String,
    pub keys: Vec<String>,
    pub unique: bool,
    pub null_filtered: bool,
    pub storing: Vec<String>,
    pub interleave: Option<String>,
}

/// Split, parse and lower every CREATE/ALTER statement in `sql`.
///
/// Each statement is parsed on its own; the first one that fails to parse
/// aborts the whole run.
pub fn parse_ddl(sql: &str, dialect: SqlDialect) -> Result<Vec<RawStatement>> {
    let parser_dialect = dialect.parser_dialect();
    let mut statements = Vec::new();

    for (i, chunk) in split_statements(sql).into_iter().enumerate() {
        let (chunk, table_ext) = extract_table_extensions(chunk);
        let (chunk, index_ext) = extract_index_extensions(&chunk);

        let parsed =
            Parser::parse_sql(parser_dialect.as_ref(), &chunk).map_err(|e| Error::Parse {
                ordinal: i + 1,
                statement: chunk.clone(),
                message: e.to_string(),
            })?;

        for stmt in parsed {
            statements.push(lower_statement(stmt, &table_ext, &index_ext));
        }
    }

    tracing::debug!(count = statements.len(), "parsed DDL statements");
    Ok(statements)
}

fn lower_statement(
    stmt: Statement,
    table_ext: &TableExtensions,
    index_ext: &IndexExtensions,
) -> RawStatement {
    match stmt {
        Statement::CreateTable(create) => {
            let mut table = RawTable {
                name: object_name(&create.name),
                columns: Vec::with_capacity(create.columns.len()),
                constraints: Vec::new(),
                interleave: table_ext.interleave.clone(),
            };

            for column in &create.columns {
                let (element, is_array) = element_type(&column.data_type);
                table.columns.push(RawColumn {
                    name: column.name.value.clone(),
                    type_descriptor: element.to_string(),
                    is_array,
                    options: column
                        .options
                        .iter()
                        .filter_map(|o| lower_column_option(&o.option))
                        .collect(),
                });
            }

            for constraint in &create.constraints {
                if let Some(raw) = lower_constraint(constraint) {
                    table.constraints.push(raw);
                }
            }

            if !table_ext.primary_key.is_empty() {
                table.constraints.push(RawConstraint {
                    kind: ConstraintKind::PrimaryKey,
                    name: String::new(),
                    keys: table_ext.primary_key.clone(),
                    referenced_table: None,
                    referenced_columns: Vec::new(),
                });
            }

            RawStatement::CreateTable(table)
        }
        Statement::CreateIndex(index) => {
            let mut storing = index_ext.storing.clone();
            storing.extend(idents(&index.include));
            RawStatement::CreateIndex(RawIndex {
                name: index.name.as_ref().map(object_name).unwrap_or_default(),
                table: object_name(&index.table_name),
                keys: index.columns.iter().map(|c| expr_name(&c.expr)).collect(),
                unique: index.unique,
                null_filtered: index_ext.null_filtered,
                storing,
                interleave: index_ext.interleave.clone(),
            })
        }
        other => {
            // Every ALTER variant (TABLE, INDEX, ROLE, POLICY, ...) renders with a leading ALTER
            let kind = statement_kind(&other);
            if kind.starts_with("ALTER") {
                RawStatement::Alter
            } else {
                RawStatement::Unsupported(kind)
            }
        }
    }
}

fn lower_column_option(option: &ColumnOption) -> Option<ColumnOptionKind> {
    let kind = match option {
        ColumnOption::NotNull => ColumnOptionKind::NotNull,
        ColumnOption::Default(expr) => ColumnOptionKind::Default(expr.to_string()),
        ColumnOption::Comment(comment) => ColumnOptionKind::Comment(comment.clone()),
        ColumnOption::Unique {
            is_primary: true, ..
        } => ColumnOptionKind::PrimaryKey,
        ColumnOption::ForeignKey {
            foreign_table,
            referred_columns,
            ..
        } => ColumnOptionKind::References {
            table: object_name(foreign_table),
            columns: idents(referred_columns),
        },
        // MySQL AUTO_INCREMENT / SQLite AUTOINCREMENT
        ColumnOption::DialectSpecific(tokens)
            if tokens.iter().any(|t| {
                let word = t.to_string();
                word.eq_ignore_ascii_case("AUTO_INCREMENT")
                    || word.eq_ignore_ascii_case("AUTOINCREMENT")
            }) =>
        {
            ColumnOptionKind::AutoIncrement
        }
        _ => return None,
    };
    Some(kind)
}

fn lower_constraint(constraint: &TableConstraint) -> Option<RawConstraint> {
    let raw = match constraint {
        TableConstraint::PrimaryKey {
            name,
            index_name,
            columns,
            ..
        } => RawConstraint::new(
            ConstraintKind::PrimaryKey,
            index_name.as_ref().or(name.as_ref()),
            columns,
        ),
        TableConstraint::Unique {
            name,
            index_name,
            columns,
            ..
        } => RawConstraint::new(
            ConstraintKind::UniqueIndex,
            index_name.as_ref().or(name.as_ref()),
            columns,
        ),
        TableConstraint::Index { name, columns, .. } => {
            RawConstraint::new(ConstraintKind::Index, name.as_ref(), columns)
        }
        TableConstraint::ForeignKey {
            name,
            columns,
            foreign_table,
            referred_columns,
            ..
        } => RawConstraint {
            referenced_table: Some(object_name(foreign_table)),
            referenced_columns: idents(referred_columns),
            ..RawConstraint::new(ConstraintKind::ForeignKey, name.as_ref(), columns)
        },
        // CHECK, FULLTEXT and SPATIAL carry nothing the model uses
        _ => return None,
    };
    Some(raw)
}

/// Element type and array flag of a column data type
fn element_type(data_type: &DataType) -> (&DataType, bool) {
    match data_type {
        DataType::Array(
            ArrayElemTypeDef::AngleBracket(inner)
            | ArrayElemTypeDef::SquareBracket(inner, _)
            | ArrayElemTypeDef::Parenthesis(inner),
        ) => (inner.as_ref(), true),
        other => (other, false),
    }
}

/// Last part of a possibly qualified name
fn object_name(name: &ObjectName) -> String {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .unwrap_or_else(|| name.to_string())
}

fn idents(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|i| i.value.clone()).collect()
}

fn expr_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Leading keywords of a statement, e.g. `CREATE VIEW`
fn statement_kind(stmt: &Statement) -> String {
    stmt.to_string()
        .split_whitespace()
        .take_while(|w| w.chars().all(|c| c.is_ascii_uppercase() || c == '_'))
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OnDelete;

    fn parse_one(sql: &str) -> RawStatement {
        let mut statements = parse_ddl(sql, SqlDialect::MySQL).unwrap();
        assert_eq!(statements.len(), 1, "{statements:?}");
        statements.remove(0)
    }

    #[test]
    fn test_lower_create_table() {
        let stmt = parse_one(
            r#"
            CREATE TABLE users (
                id BIGINT NOT NULL AUTO_INCREMENT,
                name VARCHAR(255) NOT NULL DEFAULT '' COMMENT 'display name',
                is_admin TINYINT(1) NOT NULL DEFAULT 0,
                PRIMARY KEY (id),
                UNIQUE KEY uk_name (name),
                KEY idx_admin (is_admin)
            );
            "#,
        );
        let RawStatement::CreateTable(table) = stmt else {
            panic!("expected CREATE TABLE, got {stmt:?}");
        };

        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].type_descriptor, "BIGINT");
        assert_eq!(
            table.columns[0].options,
            vec![ColumnOptionKind::NotNull, ColumnOptionKind::AutoIncrement]
        );
        assert!(table.columns[1]
            .options
            .contains(&ColumnOptionKind::Comment("display name".to_string())));
        assert_eq!(table.columns[2].type_descriptor, "TINYINT(1)");

        let kinds: Vec<_> = table.constraints.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConstraintKind::PrimaryKey,
                ConstraintKind::UniqueIndex,
                ConstraintKind::Index
            ]
        );
        assert_eq!(table.constraints[1].name, "uk_name");
        assert_eq!(table.constraints[2].keys, vec!["is_admin"]);
    }

    #[test]
    fn test_lower_foreign_keys() {
        let stmt = parse_one(
            r#"
            CREATE TABLE orders (
                id INT NOT NULL PRIMARY KEY,
                customer_id INT NOT NULL REFERENCES customers(id),
                CONSTRAINT fk_customer FOREIGN KEY (customer_id) REFERENCES customers (id)
            )
            "#,
        );
        let RawStatement::CreateTable(table) = stmt else {
            panic!("expected CREATE TABLE");
        };

        assert!(table.columns[0]
            .options
            .contains(&ColumnOptionKind::PrimaryKey));
        assert!(table.columns[1]
            .options
            .contains(&ColumnOptionKind::References {
                table: "customers".to_string(),
                columns: vec!["id".to_string()],
            }));

        let fk = &table.constraints[0];
        assert_eq!(fk.kind, ConstraintKind::ForeignKey);
        assert_eq!(fk.name, "fk_customer");
        assert_eq!(fk.keys, vec!["customer_id"]);
        assert_eq!(fk.referenced_table.as_deref(), Some("customers"));
        assert_eq!(fk.referenced_columns, vec!["id"]);
    }

    #[test]
    fn test_lower_interleaved_table() {
        let stmt = parse_one(
            "CREATE TABLE albums (singer_id BIGINT NOT NULL, album_id BIGINT NOT NULL) \
             PRIMARY KEY (singer_id, album_id), INTERLEAVE IN PARENT singers ON DELETE CASCADE;",
        );
        let RawStatement::CreateTable(table) = stmt else {
            panic!("expected CREATE TABLE");
        };

        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].kind, ConstraintKind::PrimaryKey);
        assert_eq!(table.constraints[0].keys, vec!["singer_id", "album_id"]);
        let interleave = table.interleave.unwrap();
        assert_eq!(interleave.parent, "singers");
        assert_eq!(interleave.on_delete, OnDelete::Cascade);
    }

    #[test]
    fn test_lower_create_index() {
        let stmt = parse_one(
            "CREATE UNIQUE NULL_FILTERED INDEX idx_title ON albums (title) STORING (year)",
        );
        assert_eq!(
            stmt,
            RawStatement::CreateIndex(RawIndex {
                name: "idx_title".to_string(),
                table: "albums".to_string(),
                keys: vec!["title".to_string()],
                unique: true,
                null_filtered: true,
                storing: vec!["year".to_string()],
                interleave: None,
            })
        );
    }

    #[test]
    fn test_array_column() {
        let statements =
            parse_ddl("CREATE TABLE t (tags ARRAY<VARCHAR(20)>)", SqlDialect::Generic).unwrap();
        let RawStatement::CreateTable(table) = &statements[0] else {
            panic!("expected CREATE TABLE");
        };
        assert!(table.columns[0].is_array);
        assert_eq!(table.columns[0].type_descriptor, "VARCHAR(20)");
    }

    #[test]
    fn test_alter_and_unsupported() {
        let statements = parse_ddl(
            "ALTER TABLE users ADD COLUMN age INT; CREATE VIEW v AS SELECT 1;",
            SqlDialect::MySQL,
        )
        .unwrap();
        assert_eq!(statements[0], RawStatement::Alter);
        assert_eq!(
            statements[1],
            RawStatement::Unsupported("CREATE VIEW".to_string())
        );
    }

    #[test]
    fn test_every_alter_kind_is_ignored() {
        let statements = parse_ddl(
            "ALTER ROLE app_user RENAME TO app_owner; ALTER INDEX idx_a RENAME TO idx_b;",
            SqlDialect::PostgreSQL,
        )
        .unwrap();
        assert_eq!(statements, vec![RawStatement::Alter, RawStatement::Alter]);
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let err = parse_ddl("CREATE TABLE ok (id INT); CREATE TABLE (", SqlDialect::MySQL)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { ordinal: 2, .. }), "{err:?}");
    }
}
