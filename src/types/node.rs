//! A node: an ordered group of attributes.

use super::Handle;

/// An ordered group of attributes, used for presentation and for finding an attribute's siblings.
#[derive(Debug, Clone)]
pub struct Node {
  pub handle: Handle,
  pub label: String,
  pub pos: (f32, f32),
  /// Attribute handles in declaration order.
  pub attributes: Vec<Handle>,
}

impl Node {
  pub fn new(handle: Handle, label: impl Into<String>) -> Self {
    Self {
      handle,
      label: label.into(),
      pos: (0.0, 0.0),
      attributes: Vec::new(),
    }
  }

  pub fn contains(&self, attribute: Handle) -> bool {
    self.attributes.contains(&attribute)
  }
}
