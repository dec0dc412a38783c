//! Widget kinds the core asks the widget layer to create, and their presentation properties.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AttributeRole;

/// Kind of widget-layer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
  /// Abstract base every widget specializes. Never instantiable.
  Item,
  Window,
  NodeEditor,
  Node,
  NodeAttribute(AttributeRole),
  /// Editable (or read-only) text field.
  InputText,
  /// Read-only text label.
  Text,
}

impl WidgetKind {
  /// Whether the widget layer can create an entity of this kind.
  pub fn is_instantiable(self) -> bool {
    !matches!(self, WidgetKind::Item)
  }

  /// Whether the kind stores a value readable through get/set.
  pub fn is_value_capable(self) -> bool {
    matches!(self, WidgetKind::InputText | WidgetKind::Text)
  }
}

impl fmt::Display for WidgetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WidgetKind::Item => write!(f, "item"),
      WidgetKind::Window => write!(f, "window"),
      WidgetKind::NodeEditor => write!(f, "node_editor"),
      WidgetKind::Node => write!(f, "node"),
      WidgetKind::NodeAttribute(role) => write!(f, "node_attribute({})", role),
      WidgetKind::InputText => write!(f, "input_text"),
      WidgetKind::Text => write!(f, "text"),
    }
  }
}

/// Presentation properties passed through to the widget layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetProperties {
  pub label: Option<String>,
  pub tag: Option<String>,
  pub default_value: Option<String>,
  pub pos: Option<(f32, f32)>,
  pub width: Option<u32>,
  pub height: Option<u32>,
  #[serde(default)]
  pub multiline: bool,
  #[serde(default)]
  pub readonly: bool,
  /// Overwrite mode for source text fields.
  #[serde(default)]
  pub always_overwrite: bool,
}

impl WidgetProperties {
  pub fn labeled(label: impl Into<String>) -> Self {
    Self {
      label: Some(label.into()),
      ..Self::default()
    }
  }
}
