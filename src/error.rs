//! Error kinds surfaced by the attribute graph.
//!
//! None of these are caught inside the core. They leave the editor through the event-dispatch
//! boundary ([`NodeEditor::dispatch`](crate::NodeEditor::dispatch)), where the host logs them and
//! moves on to the next event.

use thiserror::Error;

use crate::transform::TransformError;
use crate::types::Handle;

/// Errors raised while building or driving the attribute graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
  /// Invalid declaration: abstract kind, second child in a single-slot attribute, duplicate
  /// registration. Detected before any handle is minted for the offending entity.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// A handle, link or pairing the core expected is missing (stale handle, out-of-band deletion,
  /// role violation). Not recoverable locally.
  #[error("graph consistency error: {0}")]
  Consistency(String),

  /// A transform reaction's external call failed. The output attribute keeps its prior value.
  #[error("external transform failed on node {node}: {reason}")]
  ExternalTransform {
    /// Node whose transform failed.
    node: Handle,
    reason: String,
  },
}

impl GraphError {
  pub(crate) fn unknown_handle(handle: Handle) -> Self {
    GraphError::Consistency(format!("unknown handle {}", handle))
  }

  pub(crate) fn unknown_tag(tag: &str) -> Self {
    GraphError::Consistency(format!("unknown tag '{}'", tag))
  }

  pub(crate) fn external_transform(node: Handle, err: &TransformError) -> Self {
    GraphError::ExternalTransform {
      node,
      reason: err.to_string(),
    }
  }

  pub fn is_configuration(&self) -> bool {
    matches!(self, GraphError::Configuration(_))
  }

  pub fn is_consistency(&self) -> bool {
    matches!(self, GraphError::Consistency(_))
  }
}
