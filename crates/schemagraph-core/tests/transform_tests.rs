// Integration tests for the DDL to JSON transform
use pretty_assertions::assert_eq;
use schemagraph_core::dialect::SqlDialect;
use schemagraph_core::error::{DiagnosticKind, Error};
use schemagraph_core::naming::Names;
use schemagraph_core::{transform, TransformOptions, Transformed};

const SHOP_SCHEMA: &str = r#"
    SET NAMES utf8mb4;

    CREATE TABLE customers (
        id BIGINT NOT NULL AUTO_INCREMENT,
        email VARCHAR(255) NOT NULL,
        is_vip TINYINT(1) NOT NULL DEFAULT 0,
        PRIMARY KEY (id)
    );

    CREATE TABLE orders (
        id BIGINT NOT NULL AUTO_INCREMENT,
        customer_id BIGINT NOT NULL,
        billing_customer_id BIGINT,
        placed_at DATETIME NOT NULL,
        PRIMARY KEY (id),
        KEY idx_customer (customer_id),
        CONSTRAINT fk_order_customer FOREIGN KEY (customer_id) REFERENCES customers (id),
        CONSTRAINT fk_order_billing FOREIGN KEY (billing_customer_id) REFERENCES customers (id)
    );

    CREATE TABLE order_items (
        id BIGINT NOT NULL AUTO_INCREMENT,
        order_id BIGINT NOT NULL,
        tag_id INT,
        price DECIMAL(10,2) NOT NULL,
        PRIMARY KEY (id),
        CONSTRAINT fk_item_order FOREIGN KEY (order_id) REFERENCES orders (id)
    );

    CREATE TABLE information (
        id INT NOT NULL,
        body TEXT,
        PRIMARY KEY (id)
    );
"#;

const SPANNER_SCHEMA: &str = r#"
    CREATE TABLE singers (
        singer_id BIGINT NOT NULL,
        name VARCHAR(1024)
    ) PRIMARY KEY (singer_id);

    CREATE TABLE albums (
        singer_id BIGINT NOT NULL,
        album_id BIGINT NOT NULL,
        title VARCHAR(1024)
    ) PRIMARY KEY (singer_id, album_id),
      INTERLEAVE IN PARENT singers ON DELETE CASCADE;

    CREATE TABLE songs (
        singer_id BIGINT NOT NULL,
        album_id BIGINT NOT NULL,
        track_id BIGINT NOT NULL,
        song_name VARCHAR(1024)
    ) PRIMARY KEY (singer_id, album_id, track_id),
      INTERLEAVE IN PARENT albums;

    CREATE NULL_FILTERED INDEX idx_song_name ON songs (song_name) STORING (track_id),
      INTERLEAVE IN albums;
"#;

fn run(sql: &str) -> Transformed {
    transform(sql, &TransformOptions::default()).unwrap()
}

fn order_of(result: &Transformed, key: &str) -> usize {
    result.schema.get_table(key).unwrap().dependency_order
}

#[test]
fn test_dependency_order_is_permutation() {
    let result = run(SHOP_SCHEMA);
    let mut orders: Vec<_> = result
        .schema
        .tables
        .values()
        .map(|t| t.dependency_order)
        .collect();
    orders.sort();
    assert_eq!(orders, (1..=result.schema.len()).collect::<Vec<_>>());
}

#[test]
fn test_descendants_sort_first() {
    let result = run(SHOP_SCHEMA);
    for table in result.schema.tables.values() {
        for descendant in &table.descendants {
            assert!(
                order_of(&result, descendant) < table.dependency_order,
                "{descendant} should come before {}",
                table.key
            );
        }
    }

    let keys: Vec<_> = result.schema.tables.keys().cloned().collect();
    assert_eq!(keys, vec!["Information", "OrderItem", "Order", "Customer"]);
}

#[test]
fn test_foreign_key_counted_once_per_table() {
    let result = run(SHOP_SCHEMA);
    let customer = result.schema.get_table("Customer").unwrap();
    assert_eq!(customer.ref_tables, vec!["Order"]);
    assert_eq!(
        customer.descendants.iter().cloned().collect::<Vec<_>>(),
        vec!["Order", "OrderItem"]
    );
}

#[test]
fn test_interleaved_child_precedes_parent() {
    let result = run(SPANNER_SCHEMA);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let singer = result.schema.get_table("Singer").unwrap();
    assert_eq!(singer.children, vec!["Album"]);
    assert!(singer.has_descendant("Album"));
    assert!(singer.has_descendant("Song"));
    assert!(order_of(&result, "Album") < order_of(&result, "Singer"));
    assert!(order_of(&result, "Song") < order_of(&result, "Album"));

    let song = result.schema.get_table("Song").unwrap();
    assert_eq!(song.primary_key.len(), 3);
    assert_eq!(song.indexes[0].name, "idx_song_name");
    assert!(song.indexes[0].null_filtered);
    assert_eq!(song.indexes[0].interleave.as_deref(), Some("albums"));
}

#[test]
fn test_naming_properties() {
    let info = Names::derive("information");
    assert_eq!(info.plural, "informations");
    assert_eq!(Names::derive("Information").plural, "Informations");
    assert_eq!(Names::derive("information"), info);

    assert_eq!(Names::derive("user_id").json, "userId");
    assert_eq!(Names::derive("id").json, "id");
    assert_eq!(Names::derive("tag_id").camel_plural, "TagIds");
}

#[test]
fn test_type_mapping_properties() {
    let result = run(SHOP_SCHEMA);
    let customer = result.schema.get_table("Customer").unwrap();
    let vip = customer.get_column("is_vip").unwrap();
    assert_eq!(vip.target.full, "bool");
    assert!(!vip.sql_type.array);

    let email = customer.get_column("email").unwrap();
    assert_eq!(email.sql_type.len, 255);

    let order = result.schema.get_table("Order").unwrap();
    assert_eq!(order.get_column("billing_customer_id").unwrap().target.full, "*int64");
    assert_eq!(order.get_column("placed_at").unwrap().target.full, "time.Time");
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let first = run(SHOP_SCHEMA).to_json().unwrap();
    let second = run(SHOP_SCHEMA).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_shape() {
    let json = run(SPANNER_SCHEMA).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();

    assert_eq!(value["kind"], "sql");
    assert_eq!(value["srcKind"], "sql");
    let data = value["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["key"], "Song");
    assert_eq!(data[0]["dependencyOrder"], 1);
    assert_eq!(data[1]["interleave"]["parent"], "singers");
    assert_eq!(data[1]["interleave"]["onDelete"], "cascade");
    assert_eq!(data[2]["children"][0], "Album");
    assert_eq!(data[0]["primaryKey"][2]["Type"], "int64");
}

#[test]
fn test_cyclic_foreign_keys_fail() {
    let sql = r#"
        CREATE TABLE a (id INT NOT NULL, c_id INT, PRIMARY KEY (id), FOREIGN KEY (c_id) REFERENCES c (id));
        CREATE TABLE b (id INT NOT NULL, a_id INT, PRIMARY KEY (id), FOREIGN KEY (a_id) REFERENCES a (id));
        CREATE TABLE c (id INT NOT NULL, b_id INT, PRIMARY KEY (id), FOREIGN KEY (b_id) REFERENCES b (id));
    "#;
    let err = transform(sql, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, Error::CyclicSchema { ref path } if path.len() == 4), "{err:?}");
}

#[test]
fn test_parse_error_aborts() {
    let err = transform("CREATE TABLE broken (id INT", &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Parse { ordinal: 1, .. }), "{err:?}");
}

#[test]
fn test_anomalies_do_not_abort() {
    let sql = r#"
        CREATE TABLE tags (id INT NOT NULL, PRIMARY KEY (id, label));
        CREATE INDEX idx_ghost ON ghosts (id);
    "#;
    let result = run(sql);
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::ColumnNotFound, DiagnosticKind::TableNotFound]
    );
    assert_eq!(result.schema.len(), 1);
}

#[test]
fn test_postgres_dialect() {
    let sql = r#"
        CREATE TABLE accounts (id BIGINT NOT NULL PRIMARY KEY, flags INTEGER[]);
    "#;
    let options = TransformOptions {
        dialect: SqlDialect::PostgreSQL,
    };
    let result = transform(sql, &options).unwrap();
    let account = result.schema.get_table("Account").unwrap();
    assert_eq!(account.get_column("flags").unwrap().target.full, "[]*int64");
    assert_eq!(account.primary_key[0].column, "id");
}

#[test]
fn test_alter_column_inside_alter_table_is_one_statement() {
    let sql = r#"
        CREATE TABLE users (id BIGINT NOT NULL, name VARCHAR(100), PRIMARY KEY (id));
        ALTER TABLE users ALTER COLUMN name SET DEFAULT 'x';
    "#;
    for dialect in [SqlDialect::MySQL, SqlDialect::PostgreSQL] {
        let result = transform(sql, &TransformOptions { dialect }).unwrap();
        assert_eq!(result.schema.len(), 1);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }
}

#[test]
fn test_grant_with_ddl_privileges_is_skipped() {
    let sql = r#"
        CREATE TABLE products (id INT NOT NULL, PRIMARY KEY (id));
        GRANT ALTER, CREATE ON shop.* TO 'app'@'%';
    "#;
    let result = run(sql);
    assert_eq!(result.schema.len(), 1);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_mutual_foreign_keys_fail_as_cycle() {
    let sql = r#"
        CREATE TABLE a (id INT NOT NULL, b_id INT, PRIMARY KEY (id), FOREIGN KEY (b_id) REFERENCES b (id));
        CREATE TABLE b (id INT NOT NULL, a_id INT, PRIMARY KEY (id), FOREIGN KEY (a_id) REFERENCES a (id));
    "#;
    let err = transform(sql, &TransformOptions::default()).unwrap_err();
    match err {
        Error::CyclicSchema { path } => assert_eq!(path, vec!["A", "B", "A"]),
        other => panic!("expected cyclic schema error, got {other:?}"),
    }
}

#[test]
fn test_invalid_length_aborts() {
    let sql = "CREATE TABLE shapes (id INT NOT NULL, outline mytype(abc));";
    let err = transform(sql, &TransformOptions::default()).unwrap_err();
    assert!(
        matches!(err, Error::InvalidLength { ref literal, .. } if literal == "abc"),
        "{err:?}"
    );
}
