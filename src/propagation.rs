//! Single-hop value propagation.
//!
//! Output-originated: every input directly linked from the output receives the output's value,
//! then its reaction (if any). Input-originated: re-trigger from the output paired with the input
//! on the same node, so downstream consumers see the post-edit state.
//!
//! Nothing beyond the directly linked attributes is touched. A transforming node continues the
//! chain only by writing its own output and propagating from it explicitly.

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::types::{AttributeRole, Handle};

/// Nesting limit for reactions that re-enter propagation synchronously.
pub const MAX_PROPAGATION_DEPTH: usize = 64;

/// What one propagation call touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Propagation {
  /// Attributes whose stored value was overwritten with the source value.
  pub updated: Vec<Handle>,
  /// Attributes whose reaction ran.
  pub reacted: Vec<Handle>,
}

impl Propagation {
  pub fn is_empty(&self) -> bool {
    self.updated.is_empty() && self.reacted.is_empty()
  }
}

/// Propagates from `attribute`, choosing the variant by its role.
pub(crate) fn propagate(
  editor: &mut NodeEditor,
  attribute: Handle,
) -> Result<Propagation, GraphError> {
  let attr = editor.registry.resolve(attribute)?;
  let (handle, role) = (attr.handle, attr.role);
  match role {
    AttributeRole::Output => from_output(editor, handle),
    AttributeRole::Input => from_input(editor, handle),
    AttributeRole::Static => Ok(Propagation::default()),
  }
}

#[instrument(level = "trace", skip(editor))]
fn from_output(editor: &mut NodeEditor, output: Handle) -> Result<Propagation, GraphError> {
  let source = editor.registry.lookup(output)?;
  let value = editor.host.get_value(source.value_widget()?)?;
  let targets = editor.links.outgoing(&editor.registry, output)?;
  debug!(source = %output, targets = targets.len(), "propagating");

  let mut propagation = Propagation::default();
  for link in targets {
    let destination = link.destination;
    let widget = editor.registry.lookup(destination)?.value_widget()?;
    editor.host.set_value(widget, &value)?;
    propagation.updated.push(destination);

    let Some(reaction) = editor.reactions.get(&destination).cloned() else {
      trace!(%destination, link = %link.id, "no reaction registered");
      continue;
    };
    trace!(%destination, reaction = reaction.kind(), "invoking reaction");
    reaction.invoke(editor, destination, &value)?;
    propagation.reacted.push(destination);
  }
  Ok(propagation)
}

#[instrument(level = "trace", skip(editor))]
fn from_input(editor: &mut NodeEditor, input: Handle) -> Result<Propagation, GraphError> {
  match editor.registry.paired_output(input)? {
    Some(output) => from_output(editor, output),
    None => {
      trace!(%input, "node has no output; nothing downstream");
      Ok(Propagation::default())
    }
  }
}
