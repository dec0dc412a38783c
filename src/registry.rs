//! Handle -> attribute resolution table.
//!
//! Populated once per attribute at build time; entries only leave with their node. Every lookup
//! of a handle the registry does not hold is a [`GraphError::Consistency`]: the widget layer
//! emitted an event for something the core did not build (or already tore down).

use std::collections::HashMap;

use crate::error::GraphError;
use crate::types::{Attribute, AttributeRole, Handle, Node};

/// Resolves handles to live attributes and nodes.
#[derive(Debug, Default)]
pub struct Registry {
  attributes: HashMap<Handle, Attribute>,
  /// Contained widget -> owning attribute.
  widget_owners: HashMap<Handle, Handle>,
  nodes: HashMap<Handle, Node>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a freshly built attribute. Registering the same handle twice is a configuration
  /// error (an entity was built twice).
  pub fn register(&mut self, attribute: Attribute) -> Result<(), GraphError> {
    if self.attributes.contains_key(&attribute.handle) {
      return Err(GraphError::Configuration(format!(
        "attribute {} registered twice",
        attribute.handle
      )));
    }
    if let Some(widget) = attribute.widget {
      if let Some(owner) = self.widget_owners.get(&widget) {
        return Err(GraphError::Configuration(format!(
          "widget {} already belongs to attribute {}",
          widget, owner
        )));
      }
      self.widget_owners.insert(widget, attribute.handle);
    }
    self.attributes.insert(attribute.handle, attribute);
    Ok(())
  }

  pub fn register_node(&mut self, node: Node) -> Result<(), GraphError> {
    if self.nodes.contains_key(&node.handle) {
      return Err(GraphError::Configuration(format!(
        "node {} registered twice",
        node.handle
      )));
    }
    self.nodes.insert(node.handle, node);
    Ok(())
  }

  /// Drops a node together with its attributes and their widget ownership entries.
  pub(crate) fn unregister_node(&mut self, handle: Handle) -> Result<Node, GraphError> {
    let node = self
      .nodes
      .remove(&handle)
      .ok_or_else(|| GraphError::unknown_handle(handle))?;
    for attribute in &node.attributes {
      if let Some(attribute) = self.attributes.remove(attribute) {
        if let Some(widget) = attribute.widget {
          self.widget_owners.remove(&widget);
        }
      }
    }
    Ok(node)
  }

  pub fn lookup(&self, handle: Handle) -> Result<&Attribute, GraphError> {
    self
      .attributes
      .get(&handle)
      .ok_or_else(|| GraphError::unknown_handle(handle))
  }

  pub(crate) fn lookup_mut(&mut self, handle: Handle) -> Result<&mut Attribute, GraphError> {
    self
      .attributes
      .get_mut(&handle)
      .ok_or_else(|| GraphError::unknown_handle(handle))
  }

  /// Resolves either an attribute handle or the handle of its contained widget to the attribute.
  pub fn resolve(&self, handle: Handle) -> Result<&Attribute, GraphError> {
    if let Some(attribute) = self.attributes.get(&handle) {
      return Ok(attribute);
    }
    match self.widget_owners.get(&handle) {
      Some(owner) => self.lookup(*owner),
      None => Err(GraphError::unknown_handle(handle)),
    }
  }

  pub fn node(&self, handle: Handle) -> Result<&Node, GraphError> {
    self
      .nodes
      .get(&handle)
      .ok_or_else(|| GraphError::unknown_handle(handle))
  }

  /// First sibling of `attribute` on the same node with the given role.
  pub fn sibling_with_role(
    &self,
    attribute: Handle,
    role: AttributeRole,
  ) -> Result<Option<&Attribute>, GraphError> {
    let node = self.node(self.lookup(attribute)?.node)?;
    for sibling in &node.attributes {
      if *sibling == attribute {
        continue;
      }
      let candidate = self.lookup(*sibling)?;
      if candidate.role == role {
        return Ok(Some(candidate));
      }
    }
    Ok(None)
  }

  /// The output paired with an input on the same node, if the node has one.
  pub fn paired_output(&self, input: Handle) -> Result<Option<Handle>, GraphError> {
    Ok(
      self
        .sibling_with_role(input, AttributeRole::Output)?
        .map(|a| a.handle),
    )
  }

  pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
    self.attributes.values()
  }

  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.values()
  }

  pub fn len(&self) -> usize {
    self.attributes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.attributes.is_empty()
  }
}
