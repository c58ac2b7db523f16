//! Build a [`TableSchema`] from the text of one SQL script

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{ColumnDefinition, TableSchema};
use crate::error::DdlError;
use crate::parser::{
    extract_default_constraints, extract_unique_indexes, find_create_table, parse_column,
    parse_key_constraint, split_columns_block, KeyKind,
};
use crate::util::{contains_ci, dedupe_preserving_order};

/// Knobs that change how keys and defaults are resolved
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    /// Used only when the DDL declares no primary key at all
    pub primary_key_override: Vec<String>,
    /// Replaces whatever business key the DDL implies, when non-empty
    pub business_key_override: Vec<String>,
    /// Only take `ALTER TABLE ... DEFAULT` statements aimed at this table.
    /// Off by default: a default is matched on column name alone.
    pub scope_defaults: bool,
}

/// Parse one script into a [`TableSchema`].
///
/// Fails only when no `CREATE TABLE` can be located. Items that look like
/// columns but do not parse are skipped with a warning.
pub fn build_table_schema(sql: &str, options: &SchemaOptions) -> Result<TableSchema, DdlError> {
    let statement = find_create_table(sql)?;
    let (column_items, constraint_items) = split_columns_block(&statement.body);
    debug!(
        table = %format!("{}.{}", statement.schema, statement.table),
        columns = column_items.len(),
        constraints = constraint_items.len(),
        "split CREATE TABLE body"
    );

    let columns = parse_columns(&column_items);

    let primary_key_columns =
        resolve_primary_key(&constraint_items, &columns, &options.primary_key_override);
    let business_key_columns = if options.business_key_override.is_empty() {
        resolve_business_key(sql, &constraint_items, &statement.schema, &statement.table)
    } else {
        debug!("business key taken from override");
        dedupe_preserving_order(options.business_key_override.iter().cloned())
    };
    let default_expressions = resolve_defaults(
        sql,
        options
            .scope_defaults
            .then_some((statement.schema.as_str(), statement.table.as_str())),
    );

    debug!(
        primary_key = ?primary_key_columns,
        business_key = ?business_key_columns,
        defaults = default_expressions.len(),
        "resolved keys"
    );

    Ok(TableSchema {
        schema: statement.schema,
        table: statement.table,
        columns,
        primary_key_columns,
        business_key_columns,
        default_expressions,
    })
}

fn parse_columns(column_items: &[String]) -> Vec<ColumnDefinition> {
    column_items
        .iter()
        .filter_map(|item| {
            let column = parse_column(item);
            if column.is_none() {
                warn!("skipping unrecognised column definition: {}", first_line(item));
            }
            column
        })
        .collect()
}

/// Table-level PRIMARY KEY (first one wins), then inline markers, merged in
/// that order. The override only fills an otherwise empty key.
fn resolve_primary_key(
    constraint_items: &[String],
    columns: &[ColumnDefinition],
    override_columns: &[String],
) -> Vec<String> {
    let table_level = constraint_items
        .iter()
        .filter(|item| contains_ci(item, "PRIMARY"))
        .find_map(|item| parse_key_constraint(item, KeyKind::PrimaryKey))
        .map(|pk| pk.columns)
        .unwrap_or_default();

    let inline = columns
        .iter()
        .filter(|c| c.is_inline_primary_key)
        .map(|c| c.name.clone());

    let merged = dedupe_preserving_order(table_level.into_iter().chain(inline));
    if merged.is_empty() && !override_columns.is_empty() {
        debug!("primary key taken from override");
        return dedupe_preserving_order(override_columns.iter().cloned());
    }
    merged
}

/// First of: a UNIQUE constraint in the table body, a `CREATE UNIQUE INDEX`
/// on this exact table anywhere in the file. Sources are not merged.
fn resolve_business_key(
    sql: &str,
    constraint_items: &[String],
    schema: &str,
    table: &str,
) -> Vec<String> {
    let from_constraint = constraint_items
        .iter()
        .filter(|item| contains_ci(item, "UNIQUE"))
        .find_map(|item| parse_key_constraint(item, KeyKind::Unique));
    if let Some(unique) = from_constraint {
        debug!(constraint = ?unique.name, "business key from UNIQUE constraint");
        return dedupe_preserving_order(unique.columns);
    }

    let from_index = extract_unique_indexes(sql)
        .into_iter()
        .find(|index| index.targets(schema, table) && !index.columns.is_empty());
    if let Some(index) = from_index {
        debug!(index = %index.name, "business key from unique index");
        return dedupe_preserving_order(index.columns);
    }

    Vec::new()
}

/// Column -> default expression. With `scope` set, statements for other
/// tables are ignored; otherwise the last statement for a column name wins.
fn resolve_defaults(sql: &str, scope: Option<(&str, &str)>) -> HashMap<String, String> {
    extract_default_constraints(sql)
        .into_iter()
        .filter(|default| scope.map_or(true, |(schema, table)| default.targets(schema, table)))
        .map(|default| (default.column, default.expression))
        .collect()
}

fn first_line(item: &str) -> &str {
    item.lines().next().unwrap_or(item).trim()
}
