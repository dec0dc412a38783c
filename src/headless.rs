//! In-memory widget host.
//!
//! Stands in for a GUI toolkit: mints handles, keeps the entity tree, stores text values and link
//! endpoints. Used by the CLI driver and by tests.

use std::collections::HashMap;

use tracing::trace;

use crate::error::GraphError;
use crate::types::{Handle, LinkId, Value, WidgetKind, WidgetProperties};
use crate::widget::WidgetHost;

#[derive(Debug, Clone)]
struct HeadlessItem {
  kind: WidgetKind,
  parent: Option<Handle>,
  properties: WidgetProperties,
  value: Option<Value>,
}

/// In-memory [`WidgetHost`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
  next_id: u64,
  items: HashMap<Handle, HeadlessItem>,
  links: HashMap<LinkId, (Handle, Handle)>,
}

impl HeadlessHost {
  pub fn new() -> Self {
    Self::default()
  }

  fn mint(&mut self) -> u64 {
    self.next_id += 1;
    self.next_id
  }

  fn item(&self, handle: Handle) -> Result<&HeadlessItem, GraphError> {
    self
      .items
      .get(&handle)
      .ok_or_else(|| GraphError::unknown_handle(handle))
  }

  pub fn kind_of(&self, handle: Handle) -> Option<WidgetKind> {
    self.items.get(&handle).map(|i| i.kind)
  }

  pub fn parent_of(&self, handle: Handle) -> Option<Handle> {
    self.items.get(&handle).and_then(|i| i.parent)
  }

  pub fn properties_of(&self, handle: Handle) -> Option<&WidgetProperties> {
    self.items.get(&handle).map(|i| &i.properties)
  }

  pub fn item_count(&self) -> usize {
    self.items.len()
  }

  pub fn link_count(&self) -> usize {
    self.links.len()
  }

  pub fn link_endpoints(&self, link: LinkId) -> Option<(Handle, Handle)> {
    self.links.get(&link).copied()
  }
}

impl WidgetHost for HeadlessHost {
  fn add_widget(
    &mut self,
    kind: WidgetKind,
    parent: Option<Handle>,
    properties: &WidgetProperties,
  ) -> Result<Handle, GraphError> {
    if !kind.is_instantiable() {
      return Err(GraphError::Configuration(format!(
        "widget kind '{}' cannot be instantiated",
        kind
      )));
    }
    if let Some(p) = parent {
      self.item(p)?;
    }
    let handle = Handle(self.mint());
    let value = kind
      .is_value_capable()
      .then(|| properties.default_value.clone().unwrap_or_default());
    trace!(%handle, %kind, ?parent, "headless add_widget");
    self.items.insert(
      handle,
      HeadlessItem {
        kind,
        parent,
        properties: properties.clone(),
        value,
      },
    );
    Ok(handle)
  }

  fn get_value(&self, widget: Handle) -> Result<Value, GraphError> {
    let item = self.item(widget)?;
    item.value.clone().ok_or_else(|| {
      GraphError::Consistency(format!("{} widget {} holds no value", item.kind, widget))
    })
  }

  fn set_value(&mut self, widget: Handle, value: &str) -> Result<(), GraphError> {
    let item = self
      .items
      .get_mut(&widget)
      .ok_or_else(|| GraphError::unknown_handle(widget))?;
    match item.value.as_mut() {
      Some(v) => {
        *v = value.to_string();
        Ok(())
      }
      None => Err(GraphError::Consistency(format!(
        "{} widget {} holds no value",
        item.kind, widget
      ))),
    }
  }

  fn add_link(
    &mut self,
    editor: Handle,
    source: Handle,
    destination: Handle,
  ) -> Result<LinkId, GraphError> {
    if self.item(editor)?.kind != WidgetKind::NodeEditor {
      return Err(GraphError::Consistency(format!(
        "{} is not a node editor",
        editor
      )));
    }
    self.item(source)?;
    self.item(destination)?;
    let link = LinkId(self.mint());
    trace!(%link, %source, %destination, "headless add_link");
    self.links.insert(link, (source, destination));
    Ok(link)
  }

  fn remove_item(&mut self, item: Handle) -> Result<(), GraphError> {
    if self.links.remove(&LinkId(item.0)).is_some() {
      return Ok(());
    }
    self.item(item)?;
    let mut pending = vec![item];
    while let Some(h) = pending.pop() {
      self.items.remove(&h);
      pending.extend(
        self
          .items
          .iter()
          .filter(|(_, i)| i.parent == Some(h))
          .map(|(child, _)| *child),
      );
    }
    Ok(())
  }
}
