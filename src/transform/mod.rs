//! Text-transform service consumed by transform reactions.
//!
//! A transform turns the text committed on a node's input into the text of that node's output
//! (the translator nodes translate, but any text-to-text service fits). Transforms are async and
//! run on the [`TransformScheduler`] so the event path never blocks on them.

mod command;
mod glossary;
mod scheduler;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandTransform;
pub use glossary::{Glossary, GlossaryPair, GlossaryTransform};
pub use scheduler::TransformScheduler;
pub(crate) use scheduler::{TransformCompletion, TransformJob};

/// Direction of a transform: source and target language codes (e.g. `en` -> `ja`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformRequest {
  pub source: String,
  pub target: String,
}

impl TransformRequest {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
    }
  }
}

impl fmt::Display for TransformRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}->{}", self.source, self.target)
  }
}

/// Why a transform call failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
  /// The service cannot serve the request (not reachable, no such language pair).
  #[error("transform service unavailable: {0}")]
  Unavailable(String),

  #[error("malformed transform data: {0}")]
  MalformedInput(String),

  #[error("transform command exited with {code:?}: {stderr}")]
  CommandFailed { code: Option<i32>, stderr: String },

  #[error("transform timed out after {0:?}")]
  TimedOut(Duration),

  #[error("transform panicked")]
  Panicked,
}

/// An async text-to-text service.
#[async_trait]
pub trait TextTransform: Send + Sync {
  /// Short name for logs.
  fn name(&self) -> &str;

  async fn transform(
    &self,
    text: &str,
    request: &TransformRequest,
  ) -> Result<String, TransformError>;
}
