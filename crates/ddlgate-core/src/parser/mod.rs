//! Heuristic DDL parsing: statement extraction, element splitting, tokenizing

mod split;
mod statement;

pub use split::{split_elements, tokenize};
pub use statement::{
    contains_create_table, extract_statements, extract_table_body, extract_table_name,
    has_trailing_garbage,
};
