//! Typed reaction descriptors.
//!
//! A reaction is what an attribute does when a value is committed to it, either by the user or by
//! propagation from a linked output. It receives the editor so it can write other values and
//! explicitly re-propagate (the engine itself never walks further than one hop).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::transform::{TextTransform, TransformRequest};
use crate::types::Handle;

/// Side data handed to a reaction on every call (e.g. the transform direction).
pub type ReactionContext = Arc<dyn Any + Send + Sync>;

/// `(editor, attribute, new value, context)`.
pub type CommitFn =
  dyn Fn(&mut NodeEditor, Handle, &str, &ReactionContext) -> Result<(), GraphError> + Send + Sync;

/// What an attribute needs for a reaction to be registered on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionRequirement {
  None,
  /// An input whose node also carries an output to write into.
  PairedOutput,
}

/// Reaction descriptor: callback plus its context.
#[derive(Clone)]
pub struct Reaction {
  on_commit: Arc<CommitFn>,
  context: ReactionContext,
  requirement: ReactionRequirement,
  kind: &'static str,
}

impl Reaction {
  pub fn new<F>(on_commit: F, context: ReactionContext) -> Self
  where
    F: Fn(&mut NodeEditor, Handle, &str, &ReactionContext) -> Result<(), GraphError>
      + Send
      + Sync
      + 'static,
  {
    Self {
      on_commit: Arc::new(on_commit),
      context,
      requirement: ReactionRequirement::None,
      kind: "custom",
    }
  }

  /// Reaction without context.
  pub fn from_fn<F>(on_commit: F) -> Self
  where
    F: Fn(&mut NodeEditor, Handle, &str, &ReactionContext) -> Result<(), GraphError>
      + Send
      + Sync
      + 'static,
  {
    Self::new(on_commit, Arc::new(()))
  }

  /// Source reaction: push the committed value to every directly linked input.
  pub fn propagate() -> Self {
    let mut reaction = Self::from_fn(|editor, attribute, _value, _context| {
      editor.propagate(attribute).map(|_| ())
    });
    reaction.kind = "propagate";
    reaction
  }

  /// Transform reaction: transform the committed input value into the node's paired output, then
  /// re-propagate from that output once the result lands.
  pub fn transform(transform: Arc<dyn TextTransform>, request: TransformRequest) -> Self {
    let mut reaction = Self::new(
      move |editor, attribute, value, context| {
        let request = context
          .downcast_ref::<TransformRequest>()
          .ok_or_else(|| {
            GraphError::Configuration("transform reaction context is not a request".to_string())
          })?
          .clone();
        editor.schedule_transform(attribute, value, request, transform.clone())
      },
      Arc::new(request),
    );
    reaction.requirement = ReactionRequirement::PairedOutput;
    reaction.kind = "transform";
    reaction
  }

  pub fn requirement(&self) -> ReactionRequirement {
    self.requirement
  }

  pub fn kind(&self) -> &'static str {
    self.kind
  }

  pub fn context(&self) -> &ReactionContext {
    &self.context
  }

  /// The context downcast to `T`, if it is one.
  pub fn context_as<T: Any>(&self) -> Option<&T> {
    self.context.downcast_ref::<T>()
  }

  pub(crate) fn invoke(
    &self,
    editor: &mut NodeEditor,
    attribute: Handle,
    value: &str,
  ) -> Result<(), GraphError> {
    (self.on_commit)(editor, attribute, value, &self.context)
  }
}

impl fmt::Debug for Reaction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Reaction")
      .field("kind", &self.kind)
      .field("requirement", &self.requirement)
      .finish_non_exhaustive()
  }
}
