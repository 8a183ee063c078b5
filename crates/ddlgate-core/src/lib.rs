//! ddlgate-core: CREATE TABLE validation library
//!
//! Extracts table and column metadata from PostgreSQL-flavored DDL text and
//! reports every problem found as a coded error or warning, without a full
//! SQL grammar or a database connection.

pub mod conversion;
pub mod error;
pub mod optimization;
pub mod parser;
pub mod schema;
pub mod types;
pub mod validator;

pub use error::{DetailCode, RequestError, Severity, ValidationDetail};
pub use optimization::OptimizationType;
pub use schema::{ColumnInfo, TableInfo, ValidationResult};
pub use validator::validate_schema;
