use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("argtree_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const TOOL_YAML: &str = r#"
name: tool
version: "1.2.0"
description: Build and ship things.
switches:
  - flag: quiet
    alias: q
    description: Less output.
commands:
  - name: build
    alias: b
    description: Build a target.
    positionals:
      - name: target
        required: true
    arguments:
      - flag: out
        alias: o
      - flag: jobs
        alias: j
        type: integer
    options:
      - flag: release
groups:
  - name: db
    description: Database tasks.
    commands:
      - name: migrate
        positionals:
          - name: steps
            type: integer
"#;

const TOOL_JSON: &str = r#"{
  "name": "tool",
  "version": "1.2.0",
  "switches": [{ "flag": "quiet", "alias": "q" }],
  "groups": [{
    "name": "db",
    "commands": [{
      "name": "migrate",
      "positionals": [{ "name": "steps", "type": "integer" }]
    }]
  }]
}"#;

fn write_manifest(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write manifest");
    path
}

fn argtree(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_argtree"))
        .args(args)
        .output()
        .expect("failed to run argtree")
}

fn resolve(manifest: &PathBuf, args: &[&str]) -> Output {
    let mut full = vec!["resolve", manifest.to_str().unwrap(), "--"];
    full.extend_from_slice(args);
    argtree(&full)
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_prints_command_and_slots() {
    let dir = TempDir::new("resolve_build");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["build", "app.bin", "-o", "dist", "--jobs", "4", "--release"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value = json(&output);
    assert_eq!(value["command"], "build");
    assert_eq!(value["path"], serde_json::json!(["build"]));
    assert_eq!(value["slots"]["target"], "app.bin");
    assert_eq!(value["slots"]["out"], "dist");
    assert_eq!(value["slots"]["jobs"], 4);
    assert_eq!(value["slots"]["release"], true);
}

#[test]
fn resolve_reports_missing_positional() {
    let dir = TempDir::new("resolve_missing");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["build"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: missing value for positional argument [target]."));
    assert!(stderr.contains("Try: tool build --help"));
}

#[test]
fn resolve_descends_into_groups() {
    let dir = TempDir::new("resolve_group");
    let manifest = write_manifest(&dir, "tool.json", TOOL_JSON);

    let output = resolve(&manifest, &["db", "migrate", "3", "-q"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value = json(&output);
    assert_eq!(value["path"], serde_json::json!(["db", "migrate"]));
    assert_eq!(value["switches"], serde_json::json!(["quiet"]));
    assert_eq!(value["slots"]["steps"], 3);

    let output = resolve(&manifest, &["db"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: missing command name."));
    assert!(stderr.contains("Try: tool db --help"));
}

#[test]
fn resolve_escape_keeps_hyphenated_value() {
    let dir = TempDir::new("resolve_escape");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["build", "--", "-x"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["slots"]["target"], "-x");
}

#[test]
fn resolve_help_switch_skips_command() {
    let dir = TempDir::new("resolve_help");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["build", "--help", "app.bin"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: tool build [-h|--help]"));
    assert!(stdout.contains("-o, --out [TEXT]"));
    assert!(!stdout.contains("\"command\""));
}

#[test]
fn resolve_version_switch() {
    let dir = TempDir::new("resolve_version");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["-v"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "tool 1.2.0\n");
}

#[test]
fn resolve_rejects_bad_integer() {
    let dir = TempDir::new("resolve_integer");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = resolve(&manifest, &["build", "app.bin", "-j", "four"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("argument --jobs expected integer but received \"four\""));
}

// ---------------------------------------------------------------------------
// validate / help
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_manifest() {
    let dir = TempDir::new("validate_ok");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = argtree(&["validate", manifest.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Validated"));
}

#[test]
fn validate_reports_duplicates() {
    let dir = TempDir::new("validate_dup");
    let manifest = write_manifest(
        &dir,
        "dup.yaml",
        r#"
name: tool
commands:
  - name: build
    alias: b
  - name: bench
    alias: b
  - name: build
"#,
    );

    let output = argtree(&["validate", manifest.to_str().unwrap()]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("error: duplicate name in tool: build"));
    assert!(stdout.contains("warning: duplicate alias in tool: b"));
}

#[test]
fn validate_reports_unreadable_manifest() {
    let dir = TempDir::new("validate_missing");
    let output = argtree(&["validate", dir.join("nope.yaml").to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load"));
}

#[test]
fn help_renders_group_page() {
    let dir = TempDir::new("help_group");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = argtree(&["help", manifest.to_str().unwrap(), "db"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: tool db [COMMAND]\n\nDatabase tasks.\n"));
    assert!(stdout.contains("migrate"));

    let output = argtree(&["help", manifest.to_str().unwrap(), "nope"]);
    assert!(!output.status.success());
}

#[test]
fn help_renders_app_page() {
    let dir = TempDir::new("help_app");
    let manifest = write_manifest(&dir, "tool.yaml", TOOL_YAML);

    let output = argtree(&["help", manifest.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("tool 1.2.0\n\nBuild and ship things.\n"));
    assert!(stdout.contains("b| build"));
    assert!(stdout.contains("-q, --quiet"));
}
