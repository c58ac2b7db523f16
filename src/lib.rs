//! ddl2dbt: SQL Server DDL to dbt schema.yml
//!
//! Reads one SSMS-style `CREATE TABLE` script (plus any `ALTER TABLE ...
//! DEFAULT` and `CREATE UNIQUE INDEX` statements in the same file) and
//! produces the dbt model definition for a Kimball dimension or a staging
//! table.

pub mod dbt;
pub mod error;
pub mod model;
pub mod parser;
pub mod util;

use std::path::PathBuf;

use tracing::{debug, info};

pub use dbt::{ModelKind, OutputFormat, SchemaDocument};
pub use error::DdlError;
pub use model::{ColumnDefinition, Identity, TableSchema, UnknownValue};

/// Default `version` of a staging schema.yml
pub const DEFAULT_SCHEMA_VERSION: f64 = 2.0;

/// Options for converting one script
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path to the .sql file
    pub sql_path: PathBuf,
    /// Write here instead of returning the text for standard output
    pub output_path: Option<PathBuf>,
    pub kind: ModelKind,
    pub format: OutputFormat,
    /// Replaces the inferred business key (dimension)
    pub business_key: Vec<String>,
    /// Replaces the inferred surrogate key (dimension)
    pub surrogate_key: Option<String>,
    /// Used when the DDL declares no primary key (staging)
    pub primary_key: Vec<String>,
    /// schema.yml `version` (staging)
    pub version: f64,
    /// Only apply `ALTER TABLE ... DEFAULT` statements aimed at the parsed table
    pub scope_defaults: bool,
}

impl ConvertOptions {
    pub fn new(sql_path: impl Into<PathBuf>, kind: ModelKind) -> Self {
        Self {
            sql_path: sql_path.into(),
            output_path: None,
            kind,
            format: OutputFormat::Yaml,
            business_key: Vec::new(),
            surrogate_key: None,
            primary_key: Vec::new(),
            version: DEFAULT_SCHEMA_VERSION,
            scope_defaults: false,
        }
    }

    fn schema_options(&self) -> model::SchemaOptions {
        let names = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|name| parser::identifier_utils::normalize_identifier(name))
                .filter(|name| !name.is_empty())
                .collect()
        };
        model::SchemaOptions {
            primary_key_override: names(&self.primary_key),
            business_key_override: names(&self.business_key),
            scope_defaults: self.scope_defaults,
        }
    }
}

/// Parse `sql` and build the document the options ask for.
pub fn build_document(sql: &str, options: &ConvertOptions) -> Result<SchemaDocument, DdlError> {
    let table = model::build_table_schema(sql, &options.schema_options())?;
    info!(
        "parsed [{}].[{}]: {} columns",
        table.schema,
        table.table,
        table.columns.len()
    );

    let surrogate_key = options
        .surrogate_key
        .as_deref()
        .map(parser::identifier_utils::normalize_identifier);

    Ok(match options.kind {
        ModelKind::Dimension => SchemaDocument::dimension(&table, surrogate_key.as_deref()),
        ModelKind::Staging => SchemaDocument::staging(&table, options.version),
    })
}

/// Convert script text into rendered document text.
pub fn convert_sql(sql: &str, options: &ConvertOptions) -> Result<String, DdlError> {
    let document = build_document(sql, options)?;
    dbt::render(&document, options.format)
}

/// Convert the file at `options.sql_path`.
///
/// With `output_path` set the document is written there and `None` is
/// returned; otherwise the text is returned for the caller to print.
pub fn convert_file(options: &ConvertOptions) -> Result<Option<String>, DdlError> {
    debug!("reading {}", options.sql_path.display());
    let sql = parser::read_sql_file(&options.sql_path)?;
    let rendered = convert_sql(&sql, options)?;

    match &options.output_path {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| DdlError::OutputWriteError {
                path: path.clone(),
                source: e,
            })?;
            info!("wrote {}", path.display());
            Ok(None)
        }
        None => Ok(Some(rendered)),
    }
}
