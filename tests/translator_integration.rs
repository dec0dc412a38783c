//! End-to-end tests for the translator: the built layout driven through the library, and the
//! `node_translator` binary driven by script files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

use node_translator::{GlossaryTransform, HeadlessHost, build_translator, run_events};
use node_translator::{WidgetEvent, parse_script, run_script};

fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Runs the binary with a clean NODE_TRANSLATOR_* environment plus `env`.
fn run_binary(args: &[&str], env: &[(&str, &str)]) -> Output {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_node_translator"));
  cmd
    .args(args)
    .env_remove("NODE_TRANSLATOR_TRANSFORM_CMD")
    .env_remove("NODE_TRANSLATOR_GLOSSARY")
    .env_remove("NODE_TRANSLATOR_TIMEOUT_MS")
    .env("RUST_LOG", "warn")
    .stdin(Stdio::null());
  for (k, v) in env {
    cmd.env(k, v);
  }
  cmd.output().expect("run node_translator")
}

#[tokio::test]
async fn typing_english_fills_both_translator_nodes() {
  let mut editor = build_translator(
    Box::new(HeadlessHost::new()),
    Arc::new(GlossaryTransform::builtin()),
    None,
  )
  .unwrap();
  let source = editor.resolve_tag("out_attr_1").unwrap();
  let events = vec![WidgetEvent::ValueCommitted {
    item: source,
    value: "thanks cat".to_string(),
  }];
  let report = run_events(&mut editor, tokio_stream::iter(events)).await;
  assert_eq!(report.failed, 0);

  let value = |tag: &str| editor.get_value(editor.resolve_tag(tag).unwrap()).unwrap();
  assert_eq!(value("en_to_ja_out_attr_1"), "ありがとう 猫");
  assert_eq!(value("ja_to_en_out_attr_1"), "thanks cat");
}

#[tokio::test]
async fn fixture_script_runs_through_library() {
  let mut editor = build_translator(
    Box::new(HeadlessHost::new()),
    Arc::new(GlossaryTransform::builtin()),
    None,
  )
  .unwrap();
  let source = std::fs::read_to_string(fixture("round_trip.txt")).unwrap();
  let commands = parse_script(&source).unwrap();
  let mut out = Vec::new();
  run_script(&mut editor, &commands, &mut out).await.unwrap();
  assert_eq!(
    String::from_utf8(out).unwrap(),
    "en_to_ja_out_attr_1 = こんにちは 世界\n\
     ja_to_en_out_attr_1 = hello world\n\
     ja_to_en_out_attr_2 = good night\n\
     en_to_ja_out_attr_2 = 良い 夜\n"
  );
}

#[test]
fn binary_runs_fixture_script() {
  let path = fixture("round_trip.txt");
  let out = run_binary(&[path.to_str().unwrap()], &[]);
  assert!(
    out.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(stdout.contains("en_to_ja_out_attr_1 = こんにちは 世界"));
  assert!(stdout.contains("ja_to_en_out_attr_2 = good night"));
}

#[test]
fn binary_uses_glossary_file_from_env() {
  let dir = tempfile::tempdir().unwrap();
  let glossary = dir.path().join("glossary.json");
  std::fs::write(
    &glossary,
    r#"{"pairs":[{"source":"en","target":"ja","entries":{"tea":"お茶"}}]}"#,
  )
  .unwrap();
  let script = dir.path().join("tea.txt");
  std::fs::write(&script, "set out_attr_1 tea please\nwait\nshow en_to_ja_out_attr_1\n").unwrap();

  let out = run_binary(
    &[script.to_str().unwrap()],
    &[("NODE_TRANSLATOR_GLOSSARY", glossary.to_str().unwrap())],
  );
  assert!(
    out.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  assert_eq!(
    String::from_utf8_lossy(&out.stdout),
    "en_to_ja_out_attr_1 = お茶 please\n"
  );
}

#[test]
fn binary_uses_external_transform_command() {
  let dir = tempfile::tempdir().unwrap();
  let script = dir.path().join("upper.txt");
  std::fs::write(&script, "set out_attr_1 hello\nwait\nshow ja_to_en_out_attr_1\n").unwrap();

  let out = run_binary(
    &["--transform-cmd", "tr a-z A-Z", script.to_str().unwrap()],
    &[],
  );
  assert!(
    out.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&out.stderr)
  );
  assert_eq!(
    String::from_utf8_lossy(&out.stdout),
    "ja_to_en_out_attr_1 = HELLO\n"
  );
}

#[test]
fn binary_reports_failing_transform_command() {
  let dir = tempfile::tempdir().unwrap();
  let script = dir.path().join("fail.txt");
  std::fs::write(&script, "set out_attr_1 hello\nwait\nshow en_to_ja_out_attr_1\n").unwrap();

  let out = run_binary(&["--transform-cmd", "false", script.to_str().unwrap()], &[]);
  assert!(!out.status.success());
  assert_eq!(
    String::from_utf8_lossy(&out.stdout),
    "en_to_ja_out_attr_1 = \n"
  );
  assert!(String::from_utf8_lossy(&out.stderr).contains("failed transform"));
}

#[test]
fn binary_rejects_malformed_script() {
  let dir = tempfile::tempdir().unwrap();
  let script = dir.path().join("bad.txt");
  std::fs::write(&script, "set out_attr_1 hi\nfrobnicate\n").unwrap();
  let out = run_binary(&[script.to_str().unwrap()], &[]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}

#[test]
fn binary_exits_1_for_missing_script() {
  let out = run_binary(&["/nonexistent/session.txt"], &[]);
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("Error reading"));
}

#[test]
fn binary_rejects_invalid_timeout_env() {
  let path = fixture("round_trip.txt");
  let out = run_binary(
    &[path.to_str().unwrap()],
    &[("NODE_TRANSLATOR_TIMEOUT_MS", "later")],
  );
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("Configuration error"));
}
