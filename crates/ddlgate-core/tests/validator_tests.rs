// Integration tests for the schema validator
use ddlgate_core::error::{DetailCode, Severity, ValidationDetail};
use ddlgate_core::schema::{ColumnInfo, TableInfo, ValidationResult};
use ddlgate_core::types::{type_category, TypeCategory};
use ddlgate_core::validate_schema;
use pretty_assertions::assert_eq;

fn codes(details: &[ValidationDetail]) -> Vec<DetailCode> {
    details.iter().map(|d| d.code).collect()
}

fn column(name: &str, data_type: &str, raw: &str) -> ColumnInfo {
    ColumnInfo {
        name: name.to_string(),
        data_type: data_type.to_string(),
        raw: raw.to_string(),
    }
}

#[test]
fn test_users_table() {
    let result = validate_schema(
        "CREATE TABLE users (id SERIAL PRIMARY KEY, name VARCHAR(100) NOT NULL, email TEXT UNIQUE);",
    );

    let expected = ValidationResult {
        is_valid: true,
        tables: vec![TableInfo {
            name: "users".to_string(),
            columns: vec![
                column("id", "serial", "id SERIAL PRIMARY KEY"),
                column("name", "varchar", "name VARCHAR(100) NOT NULL"),
                column("email", "text", "email TEXT UNIQUE"),
            ],
            constraints: vec![],
            has_primary_key: true,
        }],
        errors: vec![],
        warnings: vec![],
    };
    assert_eq!(result, expected);
}

#[test]
fn test_no_create_table() {
    for sql in ["SELECT * FROM users;", "DROP TABLE users;", "create index i on t (a);"] {
        let result = validate_schema(sql);
        assert!(!result.is_valid);
        assert_eq!(codes(&result.errors), vec![DetailCode::NoCreateTablesFound]);
        assert!(result.tables.is_empty());
    }
}

#[test]
fn test_empty_content() {
    let result = validate_schema(" \n\t");
    assert!(!result.is_valid);
    assert_eq!(codes(&result.errors), vec![DetailCode::EmptySqlContent]);
    assert_eq!(result.errors[0].severity, Severity::Error);
}

#[test]
fn test_invalid_data_type() {
    let result = validate_schema("CREATE TABLE t (id INVALID_TYPE);");
    assert!(!result.is_valid);

    let first = &result.errors[0];
    assert_eq!(first.code, DetailCode::InvalidDataType);
    assert_eq!(first.table.as_deref(), Some("t"));
    assert_eq!(first.column.as_deref(), Some("id"));

    // The only column failed, so the table itself is rejected too
    assert_eq!(
        codes(&result.errors),
        vec![DetailCode::InvalidDataType, DetailCode::InvalidSqlSyntax]
    );
    assert!(result.tables.is_empty());
}

#[test]
fn test_duplicate_column() {
    let result = validate_schema("CREATE TABLE t (id SERIAL, id INT);");
    assert!(!result.is_valid);
    assert_eq!(codes(&result.errors), vec![DetailCode::DuplicateColumn]);
    assert_eq!(result.errors[0].column.as_deref(), Some("id"));

    assert_eq!(result.tables.len(), 1);
    assert_eq!(
        result.tables[0].columns,
        vec![column("id", "serial", "id SERIAL")]
    );
    assert_eq!(codes(&result.warnings), vec![DetailCode::NoPrimaryKey]);
}

#[test]
fn test_duplicate_column_is_case_insensitive() {
    let result =
        validate_schema("CREATE TABLE t (Email TEXT, email VARCHAR(10), id INT PRIMARY KEY);");
    assert_eq!(codes(&result.errors), vec![DetailCode::DuplicateColumn]);
    let names: Vec<&str> = result.tables[0]
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Email", "id"]);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_multiple_tables_in_order() {
    let result = validate_schema(
        r#"
            CREATE TABLE categories (id SERIAL PRIMARY KEY, name TEXT);
            CREATE TABLE products (id SERIAL PRIMARY KEY, category_id INT, price NUMERIC(10,2));
        "#,
    );
    assert!(result.is_valid);
    let names: Vec<&str> = result.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["categories", "products"]);
}

#[test]
fn test_missing_primary_key_is_a_warning() {
    let result = validate_schema(
        r#"
            CREATE TABLE a (id INT);
            CREATE TABLE b (id INT, PRIMARY KEY (id));
            CREATE TABLE c (name TEXT);
        "#,
    );
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.tables.len(), 3);

    let warned: Vec<&str> = result
        .warnings
        .iter()
        .map(|w| {
            assert_eq!(w.code, DetailCode::NoPrimaryKey);
            assert_eq!(w.severity, Severity::Warning);
            w.table.as_deref().unwrap_or_default()
        })
        .collect();
    assert_eq!(warned, vec!["a", "c"]);
    assert!(!result.tables[0].has_primary_key);
    assert!(result.tables[1].has_primary_key);
}

#[test]
fn test_orders_with_table_constraints() {
    let result = validate_schema(
        r#"
            CREATE TABLE orders (
                id BIGSERIAL,
                user_id INTEGER NOT NULL,
                amount DECIMAL(10,2),
                created_at TIMESTAMPTZ DEFAULT NOW(),
                PRIMARY KEY (id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
        "#,
    );
    assert!(result.is_valid, "{:?}", result.errors);
    let orders = result.get_table("orders").unwrap();
    assert!(orders.has_primary_key);
    assert_eq!(orders.columns.len(), 4);
    assert_eq!(orders.get_column("amount").unwrap().data_type, "decimal");
    assert_eq!(orders.get_column("created_at").unwrap().data_type, "timestamptz");
    assert_eq!(
        orders.constraints,
        vec![
            "PRIMARY KEY (id)".to_string(),
            "FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE".to_string(),
        ]
    );
}

#[test]
fn test_named_constraints() {
    let result = validate_schema(
        "CREATE TABLE t (id INT, code TEXT, CONSTRAINT pk_t PRIMARY KEY (id), CONSTRAINT uq_code UNIQUE (code));",
    );
    assert!(result.is_valid);
    assert!(result.tables[0].has_primary_key);
    assert_eq!(result.tables[0].constraints.len(), 2);
}

#[test]
fn test_invalid_constraint_keeps_table() {
    let result = validate_schema("CREATE TABLE t (id INT, CONSTRAINT 1bad UNIQUE (id));");
    assert!(!result.is_valid);
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidConstraintSyntax]);
    assert_eq!(result.errors[0].table.as_deref(), Some("t"));
    assert_eq!(result.tables.len(), 1);
    assert_eq!(
        result.tables[0].constraints,
        vec!["CONSTRAINT 1bad UNIQUE (id)".to_string()]
    );
    assert_eq!(codes(&result.warnings), vec![DetailCode::NoPrimaryKey]);
}

#[test]
fn test_partial_table_with_errors() {
    let result = validate_schema(
        "CREATE TABLE t (id INT PRIMARY KEY, bad FOO, 9lives TEXT, name, flag BOOLEAN KEY, title TEXT);",
    );
    assert!(!result.is_valid);
    assert_eq!(
        codes(&result.errors),
        vec![
            DetailCode::InvalidDataType,
            DetailCode::InvalidColumnName,
            DetailCode::InvalidSqlSyntax,
            DetailCode::InvalidColumnName,
        ]
    );
    assert_eq!(result.errors[0].column.as_deref(), Some("bad"));
    assert!(result.errors[2].message.contains("Incomplete"));

    let names: Vec<&str> = result.tables[0]
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["id", "title"]);
}

#[test]
fn test_invalid_table_names() {
    let result = validate_schema("CREATE TABLE 123table (id SERIAL);");
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidTableName]);
    assert_eq!(result.errors[0].table.as_deref(), Some("123table"));

    let result = validate_schema("CREATE TABLE my-table (id SERIAL);");
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidTableName]);
    assert_eq!(result.errors[0].table, None);
    assert!(result.tables.is_empty());
}

#[test]
fn test_identifier_length_boundary() {
    let ok = format!("CREATE TABLE {} (id INT PRIMARY KEY);", "a".repeat(63));
    assert!(validate_schema(&ok).is_valid);

    let too_long = format!("CREATE TABLE {} (id INT PRIMARY KEY);", "a".repeat(64));
    let result = validate_schema(&too_long);
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidTableName]);

    let long_column = format!("CREATE TABLE t ({} INT PRIMARY KEY);", "c".repeat(64));
    let result = validate_schema(&long_column);
    assert_eq!(result.errors[0].code, DetailCode::InvalidColumnName);
}

#[test]
fn test_empty_body() {
    let result = validate_schema("CREATE TABLE empty ();");
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidSqlSyntax]);
    assert!(result.errors[0].message.contains("empty body"));
    assert_eq!(result.errors[0].table.as_deref(), Some("empty"));
}

#[test]
fn test_trailing_garbage_skips_only_that_statement() {
    let result = validate_schema(
        r#"
            CREATE TABLE broken (id INT) garbage;
            CREATE TABLE fine (id INT PRIMARY KEY);
        "#,
    );
    assert!(!result.is_valid);
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidSqlSyntax]);
    assert!(result.errors[0].message.contains("Unexpected characters"));
    let names: Vec<&str> = result.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["fine"]);
}

#[test]
fn test_semicolon_inside_literal_cuts_statement() {
    // Known limitation: the statement scan stops at the first semicolon.
    let result = validate_schema("CREATE TABLE t (id INT PRIMARY KEY, note TEXT DEFAULT 'a;b');");
    assert!(!result.is_valid);
    assert_eq!(codes(&result.errors), vec![DetailCode::InvalidSqlSyntax]);
    assert!(result.tables.is_empty());
}

#[test]
fn test_qualified_and_quoted_names() {
    let result = validate_schema(
        r#"
            CREATE TABLE IF NOT EXISTS public.accounts (id SERIAL PRIMARY KEY);
            CREATE TABLE "Users" ("Id" SERIAL PRIMARY KEY, "Email" TEXT);
        "#,
    );
    assert!(result.is_valid, "{:?}", result.errors);
    assert_eq!(result.tables[0].name, "accounts");
    assert_eq!(result.tables[1].name, "Users");
    assert_eq!(result.tables[1].columns[0].name, "Id");
    assert_eq!(result.tables[1].columns[1].raw, "\"Email\" TEXT");
}

#[test]
fn test_type_families() {
    let result = validate_schema(
        r#"
            CREATE TABLE kitchen_sink (
                id SERIAL PRIMARY KEY,
                ratio DOUBLE PRECISION NOT NULL,
                label CHARACTER VARYING(45),
                tags TEXT[],
                scores INTEGER[],
                amount NUMERIC(15,4),
                price MONEY,
                payload JSONB,
                ref_id UUID,
                ip INET,
                area POLYGON,
                doc TSVECTOR,
                flags BIT VARYING(8),
                period TSTZRANGE,
                active BOOLEAN DEFAULT TRUE
            );
        "#,
    );
    assert!(result.is_valid, "{:?}", result.errors);
    let types: Vec<&str> = result.tables[0]
        .columns
        .iter()
        .map(|c| c.data_type.as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "serial",
            "double precision",
            "character varying",
            "text",
            "integer",
            "numeric",
            "money",
            "jsonb",
            "uuid",
            "inet",
            "polygon",
            "tsvector",
            "bit varying",
            "tstzrange",
            "boolean",
        ]
    );
}

#[test]
fn test_extracted_column_categories() {
    let result = validate_schema(
        "CREATE TABLE events (id BIGSERIAL PRIMARY KEY, payload JSONB, at TIMESTAMPTZ, tags TEXT[]);",
    );
    let categories: Vec<Option<TypeCategory>> = result.tables[0]
        .columns
        .iter()
        .map(|c| type_category(&c.data_type))
        .collect();
    assert_eq!(
        categories,
        vec![
            Some(TypeCategory::Numeric),
            Some(TypeCategory::Json),
            Some(TypeCategory::DateTime),
            Some(TypeCategory::Character),
        ]
    );
}

#[test]
fn test_check_and_references_tails() {
    let result = validate_schema(
        r#"
            CREATE TABLE products (
                id SERIAL PRIMARY KEY,
                price NUMERIC(10,2) CHECK (price >= 0),
                owner_id INT REFERENCES owners(id) ON UPDATE NO ACTION,
                status TEXT NOT NULL DEFAULT 'draft' COLLATE C
            );
        "#,
    );
    assert!(result.is_valid, "{:?}", result.errors);
    assert_eq!(result.tables[0].columns.len(), 4);
}

#[test]
fn test_validation_is_idempotent() {
    let sql = r#"
        CREATE TABLE a (id SERIAL, id INT);
        CREATE TABLE b (x FOO, y TEXT);
        CREATE TABLE c (id INT PRIMARY KEY);
    "#;
    assert_eq!(validate_schema(sql), validate_schema(sql));
}

#[test]
fn test_result_json_shape() {
    let result = validate_schema("CREATE TABLE t (id SERIAL, id INT);");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["isValid"], false);
    assert_eq!(json["errors"][0]["code"], "DUPLICATE_COLUMN");
    assert_eq!(json["errors"][0]["severity"], "ERROR");
    assert_eq!(json["errors"][0]["table"], "t");
    assert_eq!(json["errors"][0]["column"], "id");
    assert_eq!(json["warnings"][0]["code"], "NO_PRIMARY_KEY");
    assert_eq!(json["warnings"][0]["severity"], "WARNING");
    assert_eq!(json["tables"][0]["hasPrimaryKey"], false);
    assert_eq!(json["tables"][0]["columns"][0]["dataType"], "serial");

    let back: ValidationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}
