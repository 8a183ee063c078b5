//! Schema validator - extracts and checks every CREATE TABLE statement

pub mod column;
pub mod constraint;
pub mod identifier;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::error::{DetailCode, ValidationDetail};
use crate::parser::{
    contains_create_table, extract_statements, extract_table_body, extract_table_name,
    has_trailing_garbage, split_elements,
};
use crate::schema::{ColumnInfo, TableInfo, ValidationResult};

pub use column::{validate_column, ColumnFault, ValidColumn};
pub use constraint::{is_table_constraint, validate_table_constraint, ConstraintFault, ConstraintKind};
pub use identifier::is_valid_identifier;

/// Validate a DDL schema text and extract table metadata.
///
/// Never fails: every problem is reported as a detail in the result, and
/// one bad statement or column does not stop the others from being checked.
pub fn validate_schema(sql: &str) -> ValidationResult {
    if sql.trim().is_empty() {
        return ValidationResult::failed(ValidationDetail::error(
            DetailCode::EmptySqlContent,
            "Field sqlContent is required",
        ));
    }

    if !contains_create_table(sql) {
        return ValidationResult::failed(ValidationDetail::error(
            DetailCode::NoCreateTablesFound,
            "No CREATE TABLE statements found",
        ));
    }

    let outcome = extract_statements(sql)
        .into_iter()
        .map(check_statement)
        .fold(StatementOutcome::default(), StatementOutcome::merge);

    let result = ValidationResult::new(outcome.tables, outcome.errors, outcome.warnings);
    debug!(
        tables = result.tables.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "schema validated"
    );
    result
}

/// Tables and details produced by one or more statements
#[derive(Debug, Default)]
struct StatementOutcome {
    tables: Vec<TableInfo>,
    errors: Vec<ValidationDetail>,
    warnings: Vec<ValidationDetail>,
}

impl StatementOutcome {
    fn rejected(detail: ValidationDetail) -> Self {
        Self {
            errors: vec![detail],
            ..Self::default()
        }
    }

    fn merge(mut self, other: StatementOutcome) -> Self {
        self.tables.extend(other.tables);
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

fn check_statement(stmt: &str) -> StatementOutcome {
    if has_trailing_garbage(stmt) {
        return StatementOutcome::rejected(ValidationDetail::error(
            DetailCode::InvalidSqlSyntax,
            format!(
                "Unexpected characters after closing parenthesis in statement: {}",
                stmt.trim()
            ),
        ));
    }

    let table_name = match extract_table_name(stmt) {
        Some(name) if is_valid_identifier(&name) => name,
        attempted => {
            let attempted = attempted.unwrap_or_default();
            let mut detail = ValidationDetail::error(
                DetailCode::InvalidTableName,
                format!("Invalid table name: {:?}", attempted),
            );
            if !attempted.is_empty() {
                detail = detail.with_table(attempted);
            }
            return StatementOutcome::rejected(detail);
        }
    };

    let body = extract_table_body(stmt);
    if body.is_empty() {
        return StatementOutcome::rejected(
            ValidationDetail::error(
                DetailCode::InvalidSqlSyntax,
                format!("Table {:?} has empty body", table_name),
            )
            .with_table(&table_name),
        );
    }

    let elements = split_elements(body);
    debug!(table = %table_name, elements = elements.len(), "checking CREATE TABLE");

    let mut builder = TableBuilder::new(&table_name);
    for element in &elements {
        let element = element.trim();
        if element.is_empty() {
            continue;
        }
        if is_table_constraint(element) {
            trace!(table = %table_name, element, "table constraint");
            builder.add_constraint(element);
        } else {
            trace!(table = %table_name, element, "column definition");
            builder.add_column(element);
        }
    }

    builder.finish()
}

/// Accumulates the columns, constraints and details of a single table
struct TableBuilder {
    table: TableInfo,
    seen_columns: IndexSet<String>,
    errors: Vec<ValidationDetail>,
}

impl TableBuilder {
    fn new(name: &str) -> Self {
        Self {
            table: TableInfo::new(name),
            seen_columns: IndexSet::new(),
            errors: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        &self.table.name
    }

    fn add_constraint(&mut self, element: &str) {
        if let Err(fault) = validate_table_constraint(element) {
            self.errors.push(
                ValidationDetail::error(
                    DetailCode::InvalidConstraintSyntax,
                    format!(
                        "Invalid constraint in table {:?}: {} ({})",
                        self.name(),
                        element,
                        fault
                    ),
                )
                .with_table(self.name()),
            );
        }
        if mentions_primary_key(element) {
            self.table.has_primary_key = true;
        }
        self.table.constraints.push(element.to_string());
    }

    fn add_column(&mut self, element: &str) {
        let column = match validate_column(element) {
            Ok(column) => column,
            Err(fault) => {
                let detail = self.column_fault_detail(element, &fault);
                self.errors.push(detail);
                return;
            }
        };

        if !self.seen_columns.insert(column.name.to_lowercase()) {
            self.errors.push(
                ValidationDetail::error(
                    DetailCode::DuplicateColumn,
                    format!(
                        "Duplicate column {:?} in table {:?}",
                        column.name,
                        self.name()
                    ),
                )
                .with_table(self.name())
                .with_column(&column.name),
            );
            return;
        }

        if mentions_primary_key(element) {
            self.table.has_primary_key = true;
        }

        self.table.columns.push(ColumnInfo {
            data_type: column.data_type.base_name(),
            name: column.name,
            raw: element.to_string(),
        });
    }

    fn column_fault_detail(&self, element: &str, fault: &ColumnFault) -> ValidationDetail {
        let message = match fault {
            ColumnFault::Incomplete => format!(
                "Incomplete column definition in table {:?}: {}",
                self.name(),
                element
            ),
            ColumnFault::InvalidDataType { column, data_type } => format!(
                "Invalid data type {:?} for column {:?} in table {:?}",
                data_type,
                column,
                self.name()
            ),
            ColumnFault::InvalidName { column } => format!(
                "Invalid column definition in table {:?}: {} (invalid column name {:?})",
                self.name(),
                element,
                column
            ),
            ColumnFault::InvalidModifier { token, .. } => format!(
                "Invalid column definition in table {:?}: {} (unexpected token {:?})",
                self.name(),
                element,
                token
            ),
        };

        let detail = ValidationDetail::error(fault.code(), message).with_table(self.name());
        match fault.column() {
            Some(column) => detail.with_column(column),
            None => detail,
        }
    }

    fn finish(self) -> StatementOutcome {
        let TableBuilder {
            table, mut errors, ..
        } = self;

        if table.columns.is_empty() {
            errors.push(
                ValidationDetail::error(
                    DetailCode::InvalidSqlSyntax,
                    format!("Table {:?} has no valid columns", table.name),
                )
                .with_table(&table.name),
            );
            return StatementOutcome {
                errors,
                ..StatementOutcome::default()
            };
        }

        let mut warnings = Vec::new();
        if !table.has_primary_key {
            warnings.push(
                ValidationDetail::warning(
                    DetailCode::NoPrimaryKey,
                    format!("Table {:?} has no PRIMARY KEY defined", table.name),
                )
                .with_table(&table.name),
            );
        }

        StatementOutcome {
            tables: vec![table],
            errors,
            warnings,
        }
    }
}

fn mentions_primary_key(element: &str) -> bool {
    element.to_uppercase().contains("PRIMARY KEY")
}
