//! The dbt `schema.yml` document produced for one table

use crate::model::{unknown_value_for, Identity, TableSchema, UnknownValue};

use super::yaml_writer::YamlNode;

/// Which kind of dbt model the document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Kimball dimension: business/surrogate key meta and unknown members
    Dimension,
    /// Staging table: primary key meta and a top-level `version`
    Staging,
}

/// A `schema.yml` fragment describing exactly one model
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Present for staging documents only
    pub version: Option<f64>,
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub name: String,
    pub description: String,
    pub meta: ModelMeta,
    pub columns: Vec<ColumnEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelMeta {
    /// Both keys are always written, empty when unknown
    Dimension {
        business_key: Vec<String>,
        surrogate_key: String,
    },
    /// `primary_key` is written only when non-empty
    Staging { primary_key: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub name: String,
    pub description: String,
    pub data_type: String,
    pub meta: ColumnMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub nullable: bool,
    /// Dimension documents only
    pub unknown_member: Option<UnknownValue>,
    pub identity: Option<Identity>,
    pub default_expression: Option<String>,
}

impl SchemaDocument {
    /// Dimension document. `surrogate_key` overrides the single-column
    /// primary key inference.
    pub fn dimension(table: &TableSchema, surrogate_key: Option<&str>) -> Self {
        let surrogate_key = surrogate_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or_else(|| table.inferred_surrogate_key())
            .unwrap_or_default()
            .to_string();

        let meta = ModelMeta::Dimension {
            business_key: table.business_key_columns.clone(),
            surrogate_key,
        };
        Self {
            version: None,
            models: vec![model_entry(table, meta, ModelKind::Dimension)],
        }
    }

    /// Staging document with the given schema `version`.
    pub fn staging(table: &TableSchema, version: f64) -> Self {
        let meta = ModelMeta::Staging {
            primary_key: table.primary_key_columns.clone(),
        };
        Self {
            version: Some(version),
            models: vec![model_entry(table, meta, ModelKind::Staging)],
        }
    }

    /// Ordered tree for the YAML writer and JSON serializer
    pub fn to_node(&self) -> YamlNode {
        let mut root = Vec::with_capacity(2);
        if let Some(version) = self.version {
            root.push(("version".to_string(), YamlNode::Float(version)));
        }
        root.push((
            "models".to_string(),
            YamlNode::Seq(self.models.iter().map(ModelEntry::to_node).collect()),
        ));
        YamlNode::Map(root)
    }
}

impl ModelEntry {
    fn to_node(&self) -> YamlNode {
        let meta = match &self.meta {
            ModelMeta::Dimension {
                business_key,
                surrogate_key,
            } => YamlNode::map([
                ("business_key", YamlNode::str_seq(business_key)),
                ("surrogate_key", YamlNode::str(surrogate_key.as_str())),
            ]),
            ModelMeta::Staging { primary_key } if primary_key.is_empty() => YamlNode::Map(Vec::new()),
            ModelMeta::Staging { primary_key } => {
                YamlNode::map([("primary_key", YamlNode::str_seq(primary_key))])
            }
        };

        YamlNode::map([
            ("name", YamlNode::str(self.name.as_str())),
            ("description", YamlNode::str(self.description.as_str())),
            ("meta", meta),
            (
                "columns",
                YamlNode::Seq(self.columns.iter().map(ColumnEntry::to_node).collect()),
            ),
        ])
    }
}

impl ColumnEntry {
    fn to_node(&self) -> YamlNode {
        let mut meta = vec![("nullable", YamlNode::Bool(self.meta.nullable))];
        if let Some(unknown) = &self.meta.unknown_member {
            let value = match unknown {
                UnknownValue::Number(n) => YamlNode::Int(*n),
                UnknownValue::Text(s) => YamlNode::SingleQuoted(s.to_string()),
            };
            meta.push(("unknown_member", value));
        }
        if let Some(identity) = self.meta.identity {
            meta.push((
                "identity",
                YamlNode::map([
                    ("seed", YamlNode::Int(identity.seed)),
                    ("increment", YamlNode::Int(identity.increment)),
                ]),
            ));
        }
        if let Some(expr) = &self.meta.default_expression {
            meta.push(("default_expression", YamlNode::str(expr.as_str())));
        }

        YamlNode::map([
            ("name", YamlNode::str(self.name.as_str())),
            ("description", YamlNode::str(self.description.as_str())),
            ("data_type", YamlNode::str(self.data_type.as_str())),
            ("meta", YamlNode::map(meta)),
        ])
    }
}

fn model_entry(table: &TableSchema, meta: ModelMeta, kind: ModelKind) -> ModelEntry {
    let columns = table
        .columns
        .iter()
        .map(|column| ColumnEntry {
            name: column.name.clone(),
            description: String::new(),
            data_type: column.data_type.clone(),
            meta: ColumnMeta {
                nullable: column.nullable,
                unknown_member: (kind == ModelKind::Dimension)
                    .then(|| unknown_value_for(&column.data_type)),
                identity: column.identity,
                default_expression: table.default_expression_for(column).map(str::to_string),
            },
        })
        .collect();

    ModelEntry {
        name: table.table.clone(),
        description: String::new(),
        meta,
        columns,
    }
}
