//! CLI: build the translator graph on a headless host and drive it with a session script.
//!
//! Usage: `node_translator [OPTIONS] [SCRIPT]` (reads the script from stdin when omitted).
//! Example: `echo 'set out_attr_1 hello world
//! wait
//! show' | node_translator`
//!
//! `show` output goes to stdout as `tag = value` lines; logs go to stderr.
//! Set RUST_LOG=node_translator=trace for span and event detail.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use node_translator::{
  AppConfig, ConfigFlags, HeadlessHost, build_translator, config::DEFAULT_LOG_FILTER,
  parse_script, run_script,
};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Two-way English/Japanese node translator, driven by a script.
#[derive(Parser, Debug)]
#[command(name = "node_translator")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  NODE_TRANSLATOR_TRANSFORM_CMD   External transform command. Text arrives on stdin, the result is
                                  read from stdout; {source} and {target} are replaced by language
                                  codes.
  NODE_TRANSLATOR_GLOSSARY        JSON glossary for the built-in word-by-word transform.
  NODE_TRANSLATOR_TIMEOUT_MS      Transform timeout in milliseconds (0 disables).

Script commands:
  set <tag> <text>   link <src> <dst>   delink <src> <dst>   show [tag]   wait

Examples:
  node_translator session.txt
  node_translator --transform-cmd 'trans -b {source}:{target}' session.txt"#
)]
struct Args {
  /// External transform command. Overridden by NODE_TRANSLATOR_TRANSFORM_CMD if set.
  #[arg(long, value_name = "CMD")]
  transform_cmd: Option<String>,

  /// JSON glossary file. Overridden by NODE_TRANSLATOR_GLOSSARY if set.
  #[arg(long, value_name = "FILE")]
  glossary: Option<PathBuf>,

  /// Transform timeout in milliseconds. Overridden by NODE_TRANSLATOR_TIMEOUT_MS if set.
  #[arg(long, value_name = "MS")]
  timeout_ms: Option<u64>,

  /// Log filter used when RUST_LOG is unset.
  #[arg(long, value_name = "FILTER", default_value = DEFAULT_LOG_FILTER)]
  log_filter: String,

  /// Session script; stdin when omitted.
  #[arg(value_name = "SCRIPT")]
  script: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter)),
    )
    .with_writer(std::io::stderr)
    .init();

  info!("node_translator starting");
  let flags = ConfigFlags {
    transform_cmd: args.transform_cmd.clone(),
    glossary: args.glossary.clone(),
    timeout_ms: args.timeout_ms,
  };
  let config = match AppConfig::from_env(&flags) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(1);
    }
  };
  info!(transform = ?config.transform, timeout = ?config.timeout, "options (env or flags)");

  let source = match &args.script {
    Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
      format!("Error reading {}: {}", path.display(), e)
    }),
    None => {
      let mut text = String::new();
      tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map(|_| text)
        .map_err(|e| format!("Error reading stdin: {}", e))
    }
  };
  let source = match source {
    Ok(s) => s,
    Err(message) => {
      eprintln!("{}", message);
      process::exit(1);
    }
  };

  let commands = match parse_script(&source) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Script error: {}", e);
      process::exit(1);
    }
  };

  let transform = match config.build_transform() {
    Ok(t) => t,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(1);
    }
  };

  let mut editor = match build_translator(Box::new(HeadlessHost::new()), transform, config.timeout)
  {
    Ok(editor) => editor,
    Err(e) => {
      eprintln!("Build error: {}", e);
      process::exit(1);
    }
  };

  let mut stdout = std::io::stdout().lock();
  let report = match run_script(&mut editor, &commands, &mut stdout).await {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Session error: {}", e);
      process::exit(1);
    }
  };

  info!(
    processed = report.processed,
    failed = report.failed,
    transform_failures = report.transform_failures,
    "session completed"
  );
  if report.failed > 0 || report.transform_failures > 0 {
    eprintln!(
      "Session finished with {} failed command(s) and {} failed transform(s)",
      report.failed, report.transform_failures
    );
    process::exit(1);
  }
}
