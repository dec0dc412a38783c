//! External-command transform: text on stdin, result on stdout.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{TextTransform, TransformError, TransformRequest};

/// Runs an external command per transform.
///
/// Arguments may contain `{source}` and `{target}`, replaced by the request's language codes. The
/// process is killed if the transform is cancelled.
#[derive(Debug, Clone)]
pub struct CommandTransform {
  program: String,
  args: Vec<String>,
}

impl CommandTransform {
  /// Splits a command line on whitespace (no shell quoting).
  pub fn parse(command_line: &str) -> Result<Self, TransformError> {
    let mut parts = command_line.split_whitespace().map(String::from);
    let program = parts
      .next()
      .ok_or_else(|| TransformError::Unavailable("transform command is empty".to_string()))?;
    Ok(Self {
      program,
      args: parts.collect(),
    })
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  /// Arguments with the request's placeholders substituted.
  pub fn args_for(&self, request: &TransformRequest) -> Vec<String> {
    self
      .args
      .iter()
      .map(|a| {
        a.replace("{source}", &request.source)
          .replace("{target}", &request.target)
      })
      .collect()
  }
}

#[async_trait]
impl TextTransform for CommandTransform {
  fn name(&self) -> &str {
    &self.program
  }

  #[instrument(level = "trace", skip_all, fields(request = %request))]
  async fn transform(
    &self,
    text: &str,
    request: &TransformRequest,
  ) -> Result<String, TransformError> {
    let mut child = Command::new(&self.program)
      .args(self.args_for(request))
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| TransformError::Unavailable(format!("{}: {}", self.program, e)))?;

    let stdin = child.stdin.take();
    let feed = async move {
      if let Some(mut stdin) = stdin {
        // The command may exit without reading stdin; its exit status decides the outcome.
        let _ = stdin.write_all(text.as_bytes()).await;
        let _ = stdin.shutdown().await;
      }
    };
    // Feed stdin while draining stdout so large inputs cannot fill both pipes.
    let ((), output) = tokio::join!(feed, child.wait_with_output());
    let output =
      output.map_err(|e| TransformError::Unavailable(format!("{} wait: {}", self.program, e)))?;
    if !output.status.success() {
      return Err(TransformError::CommandFailed {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }
    let stdout = String::from_utf8(output.stdout)
      .map_err(|e| TransformError::MalformedInput(format!("output is not UTF-8: {}", e)))?;
    debug!(program = %self.program, bytes = stdout.len(), "transform command finished");
    Ok(stdout.trim_end_matches(['\n', '\r']).to_string())
  }
}
