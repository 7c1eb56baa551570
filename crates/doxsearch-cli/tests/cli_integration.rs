//! Integration tests for CLI behavior
//!
//! These run the built `doxsearch` binary against the generator fixtures
//! shipped with doxsearch-core, or against small search directories written
//! into a temp dir. Each run uses the temp dir as working directory and
//! clears `DOXSEARCH_CONFIG` so a developer's own config can't leak in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../doxsearch-core/tests/fixtures/search")
}

/// Run doxsearch with an isolated working directory and environment.
fn run_in(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doxsearch"))
        .args(args)
        .current_dir(cwd)
        .env_remove("DOXSEARCH_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run doxsearch")
}

/// Run doxsearch against the fixture search directory.
fn run_fixtures(args: &[&str]) -> Output {
    let cwd = TempDir::new().expect("failed to create temp dir");
    let dir = fixtures();
    let mut full = vec!["--dir", dir.to_str().unwrap()];
    full.extend_from_slice(args);
    run_in(cwd.path(), &full)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Argument handling
// =============================================================================

#[test]
fn integration_help_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_doxsearch"))
        .arg("--help")
        .output()
        .expect("failed to run doxsearch");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("doxsearch"));
    assert!(out.contains("Usage"));
    assert!(out.contains("query"));
}

#[test]
fn integration_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_doxsearch"))
        .arg("--version")
        .output()
        .expect("failed to run doxsearch");

    assert!(output.status.success());
    assert!(stdout(&output).contains("doxsearch"));
}

#[test]
fn integration_unknown_section_fails() {
    let output = run_fixtures(&["query", "f", "--section", "widgets"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown section 'widgets'"));
}

// =============================================================================
// Queries against generator fixtures
// =============================================================================

#[test]
fn integration_query_text() {
    let output = run_fixtures(&["query", "forward2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("forward2DFFT [all]"), "got: {}", out);
    assert!(out.contains("isce::signal::Signal::forward2DFFT"));
}

#[test]
fn integration_query_json_lines() {
    let output = run_fixtures(&["--json", "query", "writeb"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["key"], "writeblock");
    assert_eq!(value["label"], "writeBlock");
    assert_eq!(value["section"], "functions");
    assert!(value["targets"].as_array().is_some_and(|t| !t.is_empty()));
    assert!(value["targets"][0]["url"].as_str().unwrap().contains(".html"));
}

#[test]
fn integration_query_limit() {
    let output = run_fixtures(&["--json", "query", "f", "-n", "2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn integration_query_section_filter() {
    let output = run_fixtures(&["--json", "query", "w", "-s", "all"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn integration_query_no_match_is_success() {
    let output = run_fixtures(&["query", "zzzz"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn integration_show_exact_key() {
    let output = run_fixtures(&["--json", "show", "filter"]);
    assert!(output.status.success());
    let labels: Vec<String> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["label"].to_string())
        .collect();
    assert_eq!(labels, vec!["\"filter\"", "\"Filter\""]);
}

#[test]
fn integration_stats() {
    let output = run_fixtures(&["stats"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("shards: 4"));
    assert!(out.contains("entries: 112"));
    assert!(out.contains("all (49), functions (63)"));
}

#[test]
fn integration_sections() {
    let output = run_fixtures(&["sections"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "all\t49\nfunctions\t63\n");
}

#[test]
fn integration_check_fixtures_clean() {
    let output = run_fixtures(&["check"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 4);
    assert!(stdout(&output).lines().all(|l| l.starts_with("ok\t")));
}

// =============================================================================
// Malformed shards, config
// =============================================================================

fn broken_search_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let search = dir.path().join("search");
    fs::create_dir(&search).unwrap();
    fs::write(
        search.join("all_6f.js"),
        "var searchData=[['orbit',['Orbit',['../classisce_1_1core_1_1Orbit.html',1,'isce::core']]]];",
    )
    .unwrap();
    fs::write(search.join("all_70.js"), "var searchData=[['peg',['Peg']]];").unwrap();
    dir
}

#[test]
fn integration_malformed_shard_fails_strict() {
    let dir = broken_search_dir();
    let output = run_in(dir.path(), &["query", "orb"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("entry 'peg' has no targets"));
}

#[test]
fn integration_lenient_skips_malformed_shard() {
    let dir = broken_search_dir();
    let output = run_in(dir.path(), &["--lenient", "query", "orb"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("isce::core::Orbit"));
    assert!(stderr(&output).contains("Skipped malformed shard all_70"));
    assert_eq!(stderr(&output).lines().filter(|l| l.contains("all_70")).count(), 1);
}

#[test]
fn integration_misplaced_keys_reported_once() {
    let dir = TempDir::new().unwrap();
    let search = dir.path().join("search");
    fs::create_dir(&search).unwrap();
    fs::write(search.join("all_6f.js"), "[['width',['width','w.html']]]").unwrap();

    let output = run_in(dir.path(), &["query", "wid"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("w.html"));
    assert_eq!(stderr(&output).matches("outside bucket").count(), 1);
}

#[test]
fn integration_check_reports_failure() {
    let dir = broken_search_dir();
    let output = run_in(dir.path(), &["check"]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("ok\tall_6f\t1 entries"));
    assert!(out.contains("FAIL\tall_70\t"));
    assert!(stderr(&output).contains("1 malformed shard(s)"));
}

#[test]
fn integration_local_config_file() {
    let dir = broken_search_dir();
    fs::write(dir.path().join("doxsearch.toml"), "strict = false\nlimit = 1\n").unwrap();
    let output = run_in(dir.path(), &["query", "o"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Orbit"));
}

#[test]
fn integration_explicit_config_file() {
    let dir = broken_search_dir();
    let cfg = dir.path().join("custom.toml");
    fs::write(&cfg, "search_dir = \"search\"\nsections = [\"functions\"]\n").unwrap();
    let output = run_in(dir.path(), &["--config", cfg.to_str().unwrap(), "stats"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("shards: 0"));
}

#[test]
fn integration_config_from_env() {
    let dir = broken_search_dir();
    let cfg = dir.path().join("env.toml");
    fs::write(&cfg, "strict = false\ndefault_section = \"all\"\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_doxsearch"))
        .args(["--json", "query", "orb"])
        .current_dir(dir.path())
        .env("DOXSEARCH_CONFIG", &cfg)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run doxsearch");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["section"], "all");
    assert_eq!(value["targets"][0]["qualified_name"], "isce::core::Orbit");
}

#[test]
fn integration_missing_search_dir() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), &["--dir", "nowhere", "stats"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("Error: nowhere"));
}
