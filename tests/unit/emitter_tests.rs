//! Document emitter unit tests: exact rendering of small documents.

use ddl2dbt::dbt::{render, OutputFormat, SchemaDocument};
use ddl2dbt::model::{build_table_schema, SchemaOptions};
use pretty_assertions::assert_eq;

fn table(sql: &str) -> ddl2dbt::TableSchema {
    build_table_schema(sql, &SchemaOptions::default()).expect("CREATE TABLE should parse")
}

#[test]
fn test_dimension_yaml_layout() {
    let sql = "CREATE TABLE [dbo].[DimFlag] (\n\
               [FlagKey] [int] IDENTITY(1,1) NOT NULL PRIMARY KEY,\n\
               [Label] [nvarchar](20) NULL\n\
               )";
    let doc = SchemaDocument::dimension(&table(sql), None);
    let yaml = render(&doc, OutputFormat::Yaml).unwrap();

    let expected = "\
models:
  - name: DimFlag
    description: ''
    meta:
      business_key: []
      surrogate_key: FlagKey
    columns:
      - name: FlagKey
        description: ''
        data_type: INT
        meta:
          nullable: false
          unknown_member: -1
          identity:
            seed: 1
            increment: 1
      - name: Label
        description: ''
        data_type: NVARCHAR(20)
        meta:
          nullable: true
          unknown_member: 'Unknown'
";
    assert_eq!(yaml, expected);
}

#[test]
fn test_staging_yaml_layout() {
    let sql = "CREATE TABLE [stg].[Orders] (\n\
               [OrderId] INT NOT NULL,\n\
               [CreatedAt] DATETIME NOT NULL DEFAULT (getdate()),\n\
               CONSTRAINT [PK_Orders] PRIMARY KEY ([OrderId])\n\
               )";
    let doc = SchemaDocument::staging(&table(sql), 2.0);
    let yaml = render(&doc, OutputFormat::Yaml).unwrap();

    let expected = "\
version: 2.0
models:
  - name: Orders
    description: ''
    meta:
      primary_key:
        - OrderId
    columns:
      - name: OrderId
        description: ''
        data_type: INT
        meta:
          nullable: false
      - name: CreatedAt
        description: ''
        data_type: DATETIME
        meta:
          nullable: false
          default_expression: (getdate())
";
    assert_eq!(yaml, expected);
}

#[test]
fn test_staging_without_primary_key_has_empty_meta() {
    let doc = SchemaDocument::staging(&table("CREATE TABLE T ([A] INT)"), 2.0);
    let yaml = render(&doc, OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("    meta: {}\n"), "{}", yaml);
    assert!(!yaml.contains("primary_key"));
}

#[test]
fn test_date_unknown_member_stays_a_string() {
    let doc = SchemaDocument::dimension(&table("CREATE TABLE T ([D] DATE NULL)"), None);
    let yaml = render(&doc, OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("unknown_member: '1900-01-01'"), "{}", yaml);

    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    let value = &parsed["models"][0]["columns"][0]["meta"]["unknown_member"];
    assert_eq!(value.as_str(), Some("1900-01-01"));
}

#[test]
fn test_json_has_same_structure() {
    let doc = SchemaDocument::staging(&table("CREATE TABLE T ([A] INT NOT NULL PRIMARY KEY)"), 2.0);
    let json = render(&doc, OutputFormat::Json).unwrap();
    assert!(json.ends_with("}\n"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], serde_json::json!(2.0));
    assert_eq!(value["models"][0]["meta"]["primary_key"], serde_json::json!(["A"]));
    assert_eq!(value["models"][0]["columns"][0]["meta"]["nullable"], serde_json::json!(false));

    // Key order follows the document, not alphabetical order
    let version_at = json.find("\"version\"").unwrap();
    let models_at = json.find("\"models\"").unwrap();
    assert!(version_at < models_at);
    let name_at = json.find("\"name\"").unwrap();
    let description_at = json.find("\"description\"").unwrap();
    assert!(name_at < description_at);
}

#[test]
fn test_primary_key_without_not_null_stays_nullable() {
    let doc = SchemaDocument::staging(&table("CREATE TABLE T ([A] INT PRIMARY KEY)"), 2.0);
    assert!(doc.models[0].columns[0].meta.nullable);

    let yaml = render(&doc, OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("          nullable: true\n"), "{}", yaml);
    assert!(yaml.contains("      primary_key:\n        - A\n"), "{}", yaml);
}
