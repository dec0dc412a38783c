//! Opaque identifiers minted by the widget layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a built widget-layer entity (editor, node, attribute, widget).
///
/// Unique for the lifetime of a session. The core never interprets the number; it only uses it as
/// a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Identifier of a link, minted by the widget layer when the visual edge is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub u64);

impl LinkId {
  /// The link as a removable widget-layer item.
  pub fn as_handle(self) -> Handle {
    Handle(self.0)
  }
}

impl From<LinkId> for Handle {
  fn from(link: LinkId) -> Self {
    link.as_handle()
  }
}

impl fmt::Display for LinkId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "link#{}", self.0)
  }
}
