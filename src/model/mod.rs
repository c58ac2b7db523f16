//! Table model built from one CREATE TABLE script

mod builder;
pub mod unknown_member;

use std::collections::HashMap;

pub use builder::{build_table_schema, SchemaOptions};
pub use unknown_member::{canonical_base_type, unknown_value_for, UnknownValue};

/// `IDENTITY(seed, increment)` specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
}

/// One parsed column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name without brackets
    pub name: String,
    /// Upper-cased display type, precision kept (e.g. "DECIMAL(18,2)")
    pub data_type: String,
    /// False only when the definition says NOT NULL
    pub nullable: bool,
    pub identity: Option<Identity>,
    /// Expression of a DEFAULT written on the column itself
    pub inline_default: Option<String>,
    /// Column carries its own PRIMARY KEY marker
    pub is_inline_primary_key: bool,
}

impl ColumnDefinition {
    /// Base type used for classification, e.g. "DECIMAL" for "DECIMAL(18,2)"
    pub fn base_type(&self) -> String {
        canonical_base_type(&self.data_type)
    }
}

/// Everything the document emitter needs to know about one table.
///
/// Built once per script and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub schema: String,
    pub table: String,
    /// Columns in source order
    pub columns: Vec<ColumnDefinition>,
    pub primary_key_columns: Vec<String>,
    pub business_key_columns: Vec<String>,
    /// Column name -> expression from `ALTER TABLE ... DEFAULT (...) FOR [col]`
    pub default_expressions: HashMap<String, String>,
}

impl TableSchema {
    /// A single-column primary key is taken to be the surrogate key.
    pub fn inferred_surrogate_key(&self) -> Option<&str> {
        match self.primary_key_columns.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Default for a column: an `ALTER TABLE` default wins over an inline one.
    pub fn default_expression_for<'a>(&'a self, column: &'a ColumnDefinition) -> Option<&'a str> {
        self.default_expressions
            .get(&column.name)
            .map(String::as_str)
            .filter(|expr| !expr.is_empty())
            .or(column.inline_default.as_deref())
            .filter(|expr| !expr.is_empty())
    }
}
