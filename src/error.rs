//! Error types for ddl2dbt

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting DDL into a dbt schema document
#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Failed to read SQL file: {path}")]
    SqlFileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find a CREATE TABLE statement.")]
    CreateTableNotFound,

    #[error("CREATE TABLE [{schema}].[{table}] has no closing parenthesis")]
    UnterminatedCreateTable { schema: String, table: String },

    #[error("Failed to write output to {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON rendering error: {message}")]
    JsonError { message: String },
}

impl From<serde_json::Error> for DdlError {
    fn from(err: serde_json::Error) -> Self {
        DdlError::JsonError {
            message: err.to_string(),
        }
    }
}
