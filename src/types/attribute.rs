//! A connectable slot on a node.

use std::collections::BTreeMap;

use crate::error::GraphError;

use super::{AttributeRole, Handle, LinkId};

/// A connectable slot on a node.
///
/// The value itself lives in the widget layer, in the single contained widget; the attribute only
/// knows which widget that is. Link bookkeeping is maintained by the
/// [`LinkTable`](crate::link_table::LinkTable).
#[derive(Debug, Clone)]
pub struct Attribute {
  pub handle: Handle,
  pub role: AttributeRole,
  /// Owning node.
  pub node: Handle,
  /// Contained value widget (at most one).
  pub widget: Option<Handle>,
  pub tag: Option<String>,
  /// Link id -> source output attribute.
  pub(crate) incoming_links: BTreeMap<LinkId, Handle>,
  /// Links whose source is this attribute, in creation order.
  pub(crate) outgoing_links: Vec<LinkId>,
}

impl Attribute {
  pub fn new(handle: Handle, role: AttributeRole, node: Handle) -> Self {
    Self {
      handle,
      role,
      node,
      widget: None,
      tag: None,
      incoming_links: BTreeMap::new(),
      outgoing_links: Vec::new(),
    }
  }

  pub fn with_widget(mut self, widget: Handle) -> Self {
    self.widget = Some(widget);
    self
  }

  pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
    self.tag = Some(tag.into());
    self
  }

  /// The contained widget that stores this attribute's value.
  pub fn value_widget(&self) -> Result<Handle, GraphError> {
    self.widget.ok_or_else(|| {
      GraphError::Consistency(format!("attribute {} has no value widget", self.handle))
    })
  }

  pub fn incoming_links(&self) -> &BTreeMap<LinkId, Handle> {
    &self.incoming_links
  }

  pub fn outgoing_links(&self) -> &[LinkId] {
    &self.outgoing_links
  }

  /// Display name for logs: the tag when present, the handle otherwise.
  pub fn name(&self) -> String {
    self
      .tag
      .clone()
      .unwrap_or_else(|| self.handle.to_string())
  }
}
