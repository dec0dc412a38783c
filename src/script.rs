//! Line-oriented session scripts for driving the editor without a GUI.
//!
//! ```text
//! # comment
//! set out_attr_1 hello world
//! wait
//! show en_to_ja_out_attr_1
//! delink out_attr_1 en_to_ja_in_attr_1
//! link out_attr_1 en_to_ja_in_attr_1
//! show
//! ```
//!
//! `set` text runs to the end of the line; `\n` inside it stands for a line break.

use std::io::Write;

use thiserror::Error;
use tracing::{info, warn};

use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::event_loop::{EventLoop, EventLoopReport};
use crate::widget::WidgetEvent;

#[derive(Debug, Error)]
pub enum ScriptError {
  #[error("line {line}: {message}")]
  Parse { line: usize, message: String },

  #[error("cannot write script output: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
  /// Commit `text` to the value widget of `tag`, as if typed by the user.
  Set { tag: String, text: String },
  Link { source: String, destination: String },
  Delink { source: String, destination: String },
  /// Print one tag, or every tag when `None`.
  Show(Option<String>),
  /// Wait for in-flight transforms.
  Wait,
}

impl ScriptCommand {
  /// Parses one line. Blank lines and `#` comments yield `None`.
  pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
      Some((word, rest)) => (word, rest.trim()),
      None => (line, ""),
    };
    let command = match word {
      "set" => {
        let (tag, text) = match rest.split_once(char::is_whitespace) {
          Some((tag, text)) => (tag, text.trim_start()),
          None => (rest, ""),
        };
        if tag.is_empty() {
          return Err("set needs a tag".to_string());
        }
        Self::Set {
          tag: tag.to_string(),
          text: text.replace("\\n", "\n"),
        }
      }
      "link" | "delink" => {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [source, destination] = parts.as_slice() else {
          return Err(format!("{} needs <source-tag> <destination-tag>", word));
        };
        let (source, destination) = (source.to_string(), destination.to_string());
        if word == "link" {
          Self::Link {
            source,
            destination,
          }
        } else {
          Self::Delink {
            source,
            destination,
          }
        }
      }
      "show" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [] => Self::Show(None),
        [tag] => Self::Show(Some(tag.to_string())),
        _ => return Err("show takes at most one tag".to_string()),
      },
      "wait" if rest.is_empty() => Self::Wait,
      "wait" => return Err("wait takes no arguments".to_string()),
      other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
  }
}

/// Parses a whole script, keeping 1-based line numbers.
pub fn parse_script(source: &str) -> Result<Vec<(usize, ScriptCommand)>, ScriptError> {
  let mut commands = Vec::new();
  for (index, line) in source.lines().enumerate() {
    let line_no = index + 1;
    let parsed = ScriptCommand::parse_line(line).map_err(|message| ScriptError::Parse {
      line: line_no,
      message,
    })?;
    if let Some(command) = parsed {
      commands.push((line_no, command));
    }
  }
  Ok(commands)
}

/// Runs parsed commands against `editor`, writing `show` output to `out`.
///
/// Graph failures are logged and counted in the report; only output errors abort the run.
/// Outstanding transforms are settled before returning.
pub async fn run_script<W: Write>(
  editor: &mut NodeEditor,
  commands: &[(usize, ScriptCommand)],
  out: &mut W,
) -> Result<EventLoopReport, ScriptError> {
  let mut session = EventLoop::new(editor);
  for (line, command) in commands {
    match command {
      ScriptCommand::Wait => session.settle().await,
      ScriptCommand::Show(tag) => show(session.editor(), tag.as_deref(), out)?,
      other => match to_event(session.editor(), other) {
        Ok(Some(event)) => session.handle(event),
        Ok(None) => warn!(line, "nothing to delink"),
        Err(e) => {
          warn!(line, "script command failed");
          session.record_failure(&e);
        }
      },
    }
  }
  session.settle().await;
  let report = session.finish();
  info!(commands = commands.len(), failed = report.failed, "script finished");
  Ok(report)
}

fn to_event(
  editor: &NodeEditor,
  command: &ScriptCommand,
) -> Result<Option<WidgetEvent>, GraphError> {
  let event = match command {
    ScriptCommand::Set { tag, text } => {
      let attribute = editor.resolve_tag(tag)?;
      WidgetEvent::ValueCommitted {
        item: editor.attribute(attribute)?.value_widget()?,
        value: text.clone(),
      }
    }
    ScriptCommand::Link {
      source,
      destination,
    } => WidgetEvent::LinkCreated {
      source: editor.resolve_tag(source)?,
      destination: editor.resolve_tag(destination)?,
    },
    ScriptCommand::Delink {
      source,
      destination,
    } => {
      let source = editor.resolve_tag(source)?;
      let destination = editor.resolve_tag(destination)?;
      match editor.link_between(source, destination) {
        Some(link) => WidgetEvent::Delinked { link },
        None => return Ok(None),
      }
    }
    ScriptCommand::Show(_) | ScriptCommand::Wait => return Ok(None),
  };
  Ok(Some(event))
}

fn show<W: Write>(editor: &NodeEditor, tag: Option<&str>, out: &mut W) -> Result<(), ScriptError> {
  let tags = match tag {
    Some(tag) => match editor.resolve_tag(tag) {
      Ok(handle) => vec![(tag.to_string(), handle)],
      Err(e) => {
        writeln!(out, "{} = <{}>", tag, e)?;
        return Ok(());
      }
    },
    None => editor.tags(),
  };
  for (tag, handle) in tags {
    match editor.get_value(handle) {
      Ok(value) => writeln!(out, "{} = {}", tag, value.replace('\n', "\\n"))?,
      Err(e) => writeln!(out, "{} = <{}>", tag, e)?,
    }
  }
  Ok(())
}
