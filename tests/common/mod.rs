//! Common test utilities for ddl2dbt tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use ddl2dbt::{ConvertOptions, DdlError, ModelKind};
use tempfile::TempDir;

/// Test context with a temporary directory holding one SQL script
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
    pub sql_path: PathBuf,
}

impl TestContext {
    /// Copy `tests/fixtures/<fixture_name>` into a temp directory
    pub fn with_fixture(fixture_name: &str) -> Self {
        let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture_name);
        let sql = fs::read(&fixture_path).expect("Failed to read fixture");
        Self::with_bytes(&sql)
    }

    /// Write `sql` to `input.sql` in a temp directory
    pub fn with_sql(sql: &str) -> Self {
        Self::with_bytes(sql.as_bytes())
    }

    pub fn with_bytes(bytes: &[u8]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        let sql_path = dir.join("input.sql");
        fs::write(&sql_path, bytes).expect("Failed to write SQL file");

        Self {
            _temp_dir: temp_dir,
            dir,
            sql_path,
        }
    }

    pub fn options(&self, kind: ModelKind) -> ConvertOptions {
        ConvertOptions::new(&self.sql_path, kind)
    }

    /// Convert through the library and return the rendered text
    pub fn convert(&self, options: &ConvertOptions) -> Result<String, DdlError> {
        ddl2dbt::convert_file(options).map(|out| out.expect("Expected rendered output"))
    }

    /// Run the built binary with `args`, the script path substituted for `{sql}`
    pub fn run_cli(&self, args: &[&str]) -> CliResult {
        let sql_path = self.sql_path.to_string_lossy().to_string();
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.replace("{sql}", &sql_path))
            .collect();
        run_binary(&args, &self.dir)
    }
}

/// Outcome of one binary invocation
pub struct CliResult {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_binary(args: &[String], cwd: &Path) -> CliResult {
    let output = Command::new(env!("CARGO_BIN_EXE_ddl2dbt"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ddl2dbt binary");

    CliResult {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Parse emitted YAML for structural checks
pub fn parse_yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).expect("Emitted YAML should parse")
}

/// `models[0]` of a parsed document
pub fn first_model(doc: &serde_yaml::Value) -> &serde_yaml::Value {
    &doc["models"][0]
}

/// Column entry by name
pub fn column<'a>(model: &'a serde_yaml::Value, name: &str) -> &'a serde_yaml::Value {
    model["columns"]
        .as_sequence()
        .expect("columns should be a sequence")
        .iter()
        .find(|c| c["name"].as_str() == Some(name))
        .unwrap_or_else(|| panic!("column {} not found", name))
}
