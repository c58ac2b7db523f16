//! SQL Server DDL parsing

mod column_parser;
mod constraint_parser;
mod ddl_parser;
pub mod identifier_utils;
mod table_splitter;
mod token_parser_base;

pub use column_parser::{parse_column, ColumnTokenParser};
pub use constraint_parser::{parse_column_list, parse_key_constraint, KeyConstraint, KeyKind};
pub use ddl_parser::{
    decode_sql_bytes, extract_default_constraints, extract_unique_indexes, find_create_table,
    read_sql_file, CreateTableStatement, DefaultConstraint, UniqueIndex,
};
pub use table_splitter::{split_columns_block, split_top_level};
