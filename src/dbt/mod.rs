//! Generate dbt `schema.yml` documents

mod document;
pub mod yaml_writer;

pub use document::{ColumnEntry, ColumnMeta, ModelEntry, ModelKind, ModelMeta, SchemaDocument};
pub use yaml_writer::YamlNode;

use crate::error::DdlError;

/// Serialization of the finished document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Block YAML, two-space indent, key order preserved
    #[default]
    Yaml,
    /// Pretty-printed JSON with the same structure and key order
    Json,
}

/// Render a document in the requested format; the text ends with a newline.
pub fn render(document: &SchemaDocument, format: OutputFormat) -> Result<String, DdlError> {
    let node = document.to_node();
    match format {
        OutputFormat::Yaml => Ok(yaml_writer::to_yaml_string(&node)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&node)?;
            json.push('\n');
            Ok(json)
        }
    }
}
