//! Integration tests for the ddl2dbt binary: output streams and exit codes

use crate::common::{first_model, parse_yaml, run_binary, TestContext};

#[test]
fn test_dim_prints_yaml_to_stdout() {
    let ctx = TestContext::with_fixture("dim_user.sql");
    let result = ctx.run_cli(&["dim", "{sql}"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    let doc = parse_yaml(&result.stdout);
    assert_eq!(first_model(&doc)["name"].as_str(), Some("DimUser"));
    assert!(result.stdout.contains("unknown_member: 'Unknown'"));
}

#[test]
fn test_stage_flags() {
    let ctx = TestContext::with_fixture("stg_no_pk.sql");
    let result = ctx.run_cli(&["stage", "{sql}", "--pk", "EventId, Payload", "--version", "2.5"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.starts_with("version: 2.5\n"));
    let doc = parse_yaml(&result.stdout);
    let pk = &first_model(&doc)["meta"]["primary_key"];
    assert_eq!(pk[0].as_str(), Some("EventId"));
    assert_eq!(pk[1].as_str(), Some("Payload"));
}

#[test]
fn test_primary_key_alias() {
    let ctx = TestContext::with_fixture("stg_no_pk.sql");
    let result = ctx.run_cli(&["stage", "{sql}", "--primary-key", "EventId"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("primary_key:\n        - EventId\n"));
}

#[test]
fn test_dim_key_overrides() {
    let ctx = TestContext::with_fixture("dim_user.sql");
    let result = ctx.run_cli(&[
        "dim",
        "{sql}",
        "--business-key",
        "UserName",
        "--surrogate-key",
        "UserId",
    ]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    let doc = parse_yaml(&result.stdout);
    let meta = &first_model(&doc)["meta"];
    assert_eq!(meta["surrogate_key"].as_str(), Some("UserId"));
    assert_eq!(meta["business_key"][0].as_str(), Some("UserName"));
}

#[test]
fn test_json_format_flag() {
    let ctx = TestContext::with_fixture("dim_user.sql");
    let result = ctx.run_cli(&["dim", "{sql}", "--format", "json"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    let value: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(value["models"][0]["name"], "DimUser");
}

#[test]
fn test_output_flag_writes_file_and_nothing_to_stdout() {
    let ctx = TestContext::with_fixture("dim_user.sql");
    let out = ctx.dir.join("out.yml");
    let out_arg = out.to_string_lossy().to_string();
    let result = ctx.run_cli(&["dim", "{sql}", "-o", &out_arg]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("models:\n"));
}

#[test]
fn test_missing_create_table_exits_1_without_output() {
    let ctx = TestContext::with_fixture("no_create_table.sql");
    let result = ctx.run_cli(&["dim", "{sql}"]);

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.is_empty(), "stdout: {}", result.stdout);
    assert!(result.stderr.contains("Could not find a CREATE TABLE statement."));
}

#[test]
fn test_unreadable_file_exits_1() {
    let ctx = TestContext::with_sql("");
    let result = ctx.run_cli(&["stage", "does_not_exist.sql"]);

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.is_empty());
    assert!(result.stderr.starts_with("error: "));
}

#[test]
fn test_missing_argument_exits_2() {
    let ctx = TestContext::with_sql("");
    let result = ctx.run_cli(&["dim"]);
    assert_eq!(result.code, Some(2));
    assert!(result.stdout.is_empty());
}

#[test]
fn test_missing_subcommand_exits_2() {
    let result = run_binary(&[], std::env::temp_dir().as_path());
    assert_eq!(result.code, Some(2));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let ctx = TestContext::with_fixture("dim_user.sql");
    let result = ctx.run_cli(&["--verbose", "dim", "{sql}"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stderr.contains("resolved keys"));
    parse_yaml(&result.stdout);
}

#[test]
fn test_comments_in_table_body_convert_cleanly() {
    let ctx = TestContext::with_fixture("dim_commented.sql");
    let result = ctx.run_cli(&["dim", "{sql}"]);

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    let doc = parse_yaml(&result.stdout);
    let model = first_model(&doc);
    assert_eq!(model["name"].as_str(), Some("DimProduct"));
    assert_eq!(model["meta"]["surrogate_key"].as_str(), Some("ProductKey"));
    assert_eq!(model["meta"]["business_key"][0].as_str(), Some("Sku"));

    let names: Vec<_> = model["columns"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ProductKey", "Sku", "Name"]);
}
