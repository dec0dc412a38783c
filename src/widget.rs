//! Narrow interface to the widget/rendering layer.
//!
//! The core never renders anything. It asks the widget layer to create entities, read and write
//! the values stored in value widgets, and draw or remove link visuals. The widget layer in turn
//! delivers [`WidgetEvent`]s to [`NodeEditor::dispatch`](crate::NodeEditor::dispatch).

use crate::error::GraphError;
use crate::types::{Handle, LinkId, Value, WidgetKind, WidgetProperties};

/// Operations the core consumes from the widget layer.
pub trait WidgetHost {
  /// Creates an entity of `kind` under `parent` and returns its freshly minted handle.
  fn add_widget(
    &mut self,
    kind: WidgetKind,
    parent: Option<Handle>,
    properties: &WidgetProperties,
  ) -> Result<Handle, GraphError>;

  /// Reads the value stored in a value widget.
  fn get_value(&self, widget: Handle) -> Result<Value, GraphError>;

  /// Overwrites the value stored in a value widget.
  fn set_value(&mut self, widget: Handle, value: &str) -> Result<(), GraphError>;

  /// Mints a link id and renders the edge between two attributes of `editor`.
  fn add_link(
    &mut self,
    editor: Handle,
    source: Handle,
    destination: Handle,
  ) -> Result<LinkId, GraphError>;

  /// Removes an entity or a link visual.
  fn remove_item(&mut self, item: Handle) -> Result<(), GraphError>;
}

/// Event delivered by the widget layer, one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
  /// A leaf widget committed a new value. `item` is the attribute or its contained widget.
  ValueCommitted { item: Handle, value: Value },
  /// The user drew a link from an output attribute to an input attribute.
  LinkCreated { source: Handle, destination: Handle },
  /// The user removed a link.
  Delinked { link: LinkId },
}
