//! The node editor: registry, link table, reactions and transform scheduler behind the
//! widget-layer event handlers.
//!
//! Every event runs to completion before the next one is processed. Transform results are the
//! only deferred work; they are applied at the start of the next [`NodeEditor::dispatch`], or
//! through [`NodeEditor::pump`] / [`NodeEditor::settle`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::GraphError;
use crate::link_table::LinkTable;
use crate::propagation::{self, MAX_PROPAGATION_DEPTH, Propagation};
use crate::reaction::{Reaction, ReactionRequirement};
use crate::registry::Registry;
use crate::transform::{
  TextTransform, TransformCompletion, TransformJob, TransformRequest, TransformScheduler,
};
use crate::types::{Attribute, AttributeRole, Handle, LinkId, LinkRecord, Value};
use crate::widget::{WidgetEvent, WidgetHost};

/// A built attribute graph bound to its widget host.
pub struct NodeEditor {
  handle: Handle,
  pub(crate) host: Box<dyn WidgetHost>,
  pub(crate) registry: Registry,
  pub(crate) links: LinkTable,
  pub(crate) reactions: HashMap<Handle, Reaction>,
  tags: HashMap<String, Handle>,
  transforms: TransformScheduler,
  failures: Vec<GraphError>,
  depth: usize,
}

impl NodeEditor {
  pub(crate) fn new(handle: Handle, host: Box<dyn WidgetHost>) -> Self {
    Self {
      handle,
      host,
      registry: Registry::new(),
      links: LinkTable::new(),
      reactions: HashMap::new(),
      tags: HashMap::new(),
      transforms: TransformScheduler::new(),
      failures: Vec::new(),
      depth: 0,
    }
  }

  /// Handle of the editor entity in the widget layer.
  pub fn handle(&self) -> Handle {
    self.handle
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  pub fn links(&self) -> &LinkTable {
    &self.links
  }

  pub fn transforms(&self) -> &TransformScheduler {
    &self.transforms
  }

  pub fn transforms_mut(&mut self) -> &mut TransformScheduler {
    &mut self.transforms
  }

  pub(crate) fn register_tag(&mut self, tag: &str, attribute: Handle) -> Result<(), GraphError> {
    if let Some(existing) = self.tags.get(tag) {
      return Err(GraphError::Configuration(format!(
        "tag '{}' already names {}",
        tag, existing
      )));
    }
    self.tags.insert(tag.to_string(), attribute);
    Ok(())
  }

  pub fn resolve_tag(&self, tag: &str) -> Result<Handle, GraphError> {
    self
      .tags
      .get(tag)
      .copied()
      .ok_or_else(|| GraphError::unknown_tag(tag))
  }

  /// All tags with their attribute handles, sorted by tag.
  pub fn tags(&self) -> Vec<(String, Handle)> {
    let mut tags: Vec<(String, Handle)> =
      self.tags.iter().map(|(t, h)| (t.clone(), *h)).collect();
    tags.sort();
    tags
  }

  /// Resolves an attribute or contained-widget handle to its attribute.
  pub fn attribute(&self, handle: Handle) -> Result<&Attribute, GraphError> {
    self.registry.resolve(handle)
  }

  pub fn get_value(&self, attribute: Handle) -> Result<Value, GraphError> {
    let widget = self.registry.resolve(attribute)?.value_widget()?;
    self.host.get_value(widget)
  }

  /// Stores a value without propagating it.
  pub fn set_value(&mut self, attribute: Handle, value: &str) -> Result<(), GraphError> {
    let widget = self.registry.resolve(attribute)?.value_widget()?;
    self.host.set_value(widget, value)
  }

  /// Registers the reaction an attribute runs when a value is committed to it.
  pub fn register_reaction(
    &mut self,
    attribute: Handle,
    reaction: Reaction,
  ) -> Result<(), GraphError> {
    let attr = self.registry.resolve(attribute)?;
    let handle = attr.handle;
    if attr.widget.is_none() {
      return Err(GraphError::Configuration(format!(
        "attribute {} has no value widget to react on",
        attr.name()
      )));
    }
    if self.reactions.contains_key(&handle) {
      return Err(GraphError::Configuration(format!(
        "attribute {} already has a reaction",
        attr.name()
      )));
    }
    if reaction.requirement() == ReactionRequirement::PairedOutput {
      if attr.role != AttributeRole::Input {
        return Err(GraphError::Configuration(format!(
          "{} reaction needs an input attribute, {} is {}",
          reaction.kind(),
          attr.name(),
          attr.role
        )));
      }
      if self.registry.paired_output(handle)?.is_none() {
        return Err(GraphError::Configuration(format!(
          "{} reaction on {} needs an output on the same node",
          reaction.kind(),
          attr.name()
        )));
      }
    }
    debug!(attribute = %handle, reaction = reaction.kind(), "reaction registered");
    self.reactions.insert(handle, reaction);
    Ok(())
  }

  /// Records a link and copies the source value into the destination.
  #[instrument(level = "trace", skip(self))]
  pub fn create_link(
    &mut self,
    source: Handle,
    destination: Handle,
  ) -> Result<LinkId, GraphError> {
    let source = self.registry.resolve(source)?.handle;
    let destination = self.registry.resolve(destination)?.handle;
    LinkTable::validate(&self.registry, source, destination)?;

    let id = self.host.add_link(self.handle, source, destination)?;
    self.links.insert(
      &mut self.registry,
      LinkRecord {
        id,
        source,
        destination,
      },
    )?;
    let value = self.get_value(source)?;
    self.set_value(destination, &value)?;
    debug!(link = %id, %source, %destination, "link created");
    Ok(id)
  }

  /// Removes a link. The destination keeps its value. Unknown ids are a no-op.
  #[instrument(level = "trace", skip(self))]
  pub fn delete_link(&mut self, link: LinkId) -> Result<Option<LinkRecord>, GraphError> {
    if self.links.get(link).is_none() {
      debug!(%link, "ignoring unknown link");
      return Ok(None);
    }
    self.host.remove_item(link.as_handle())?;
    let record = self.links.remove(&mut self.registry, link);
    debug!(%link, "link deleted");
    Ok(record)
  }

  pub fn link_between(&self, source: Handle, destination: Handle) -> Option<LinkId> {
    self.links.between(source, destination)
  }

  /// Notifies the attributes directly linked to `attribute` (see [`propagation`]).
  pub fn propagate(&mut self, attribute: Handle) -> Result<Propagation, GraphError> {
    if self.depth >= MAX_PROPAGATION_DEPTH {
      return Err(GraphError::Consistency(format!(
        "propagation from {} nested deeper than {}",
        attribute, MAX_PROPAGATION_DEPTH
      )));
    }
    self.depth += 1;
    let result = propagation::propagate(self, attribute);
    self.depth -= 1;
    result
  }

  /// Widget layer drew a link: record it, then push the source value downstream.
  pub fn on_link(&mut self, source: Handle, destination: Handle) -> Result<LinkId, GraphError> {
    let link = self.create_link(source, destination)?;
    let source = self.registry.resolve(source)?.handle;
    self.propagate(source)?;
    Ok(link)
  }

  /// Widget layer removed a link: drop it, then re-trigger from the former destination's node.
  pub fn on_delink(&mut self, link: LinkId) -> Result<Option<LinkRecord>, GraphError> {
    let Some(record) = self.delete_link(link)? else {
      return Ok(None);
    };
    self.propagate(record.destination)?;
    Ok(Some(record))
  }

  /// A leaf widget committed a value: store it and run the attribute's reaction.
  pub fn on_value_committed(&mut self, item: Handle, value: &str) -> Result<(), GraphError> {
    let attribute = self.registry.resolve(item)?.handle;
    self.set_value(attribute, value)?;
    let Some(reaction) = self.reactions.get(&attribute).cloned() else {
      return Ok(());
    };
    reaction.invoke(self, attribute, value)
  }

  /// Processes one widget-layer event, after applying transform results that arrived since the
  /// previous one.
  ///
  /// Returns the event's own error. Failures of the transform results applied first are kept for
  /// [`NodeEditor::take_failures`].
  #[instrument(level = "debug", skip(self))]
  pub fn dispatch(&mut self, event: WidgetEvent) -> Result<(), GraphError> {
    let failures = self.pump();
    self.failures.extend(failures);
    match event {
      WidgetEvent::ValueCommitted { item, value } => self.on_value_committed(item, &value),
      WidgetEvent::LinkCreated {
        source,
        destination,
      } => self.on_link(source, destination).map(|_| ()),
      WidgetEvent::Delinked { link } => self.on_delink(link).map(|_| ()),
    }
  }

  /// Applies every transform result already queued. Returns the failures.
  pub fn pump(&mut self) -> Vec<GraphError> {
    let mut failures = Vec::new();
    while let Some(completion) = self.transforms.try_next() {
      if let Err(e) = self.apply_completion(completion) {
        warn!(error = %e, "transform result not applied");
        failures.push(e);
      }
    }
    failures
  }

  /// Waits for all in-flight transforms (including ones their results trigger) and applies them.
  pub async fn settle(&mut self) -> Vec<GraphError> {
    let mut failures = self.pump();
    while let Some(result) = self.apply_next().await {
      if let Err(e) = result {
        failures.push(e);
      }
    }
    failures
  }

  /// Waits for the next transform result and applies it. `None` when nothing is in flight.
  pub async fn apply_next(&mut self) -> Option<Result<(), GraphError>> {
    let completion = self.transforms.next().await?;
    let result = self.apply_completion(completion);
    if let Err(e) = &result {
      warn!(error = %e, "transform result not applied");
    }
    Some(result)
  }

  /// Tears a node down: cancels its transform, drops every link touching its attributes, then
  /// forgets its attributes, tags and reactions and removes it from the widget layer.
  #[instrument(level = "debug", skip(self))]
  pub fn remove_node(&mut self, node: Handle) -> Result<(), GraphError> {
    let attributes = self.registry.node(node)?.attributes.clone();
    self.transforms.cancel(node);

    let mut links = Vec::new();
    for attribute in &attributes {
      let attr = self.registry.lookup(*attribute)?;
      links.extend(attr.incoming_links.keys().copied());
      links.extend(attr.outgoing_links.iter().copied());
    }
    for link in links {
      self.delete_link(link)?;
    }

    for attribute in &attributes {
      self.reactions.remove(attribute);
    }
    self.tags.retain(|_, handle| !attributes.contains(handle));
    self.registry.unregister_node(node)?;
    self.host.remove_item(node)?;
    info!(%node, attributes = attributes.len(), "node removed");
    Ok(())
  }

  /// Abandons the transform in flight for `node`.
  pub fn cancel_transforms(&mut self, node: Handle) -> bool {
    self.transforms.cancel(node)
  }

  /// Transform failures collected by `dispatch` since the last call.
  pub fn take_failures(&mut self) -> Vec<GraphError> {
    std::mem::take(&mut self.failures)
  }

  pub(crate) fn schedule_transform(
    &mut self,
    input: Handle,
    value: &str,
    request: TransformRequest,
    transform: Arc<dyn TextTransform>,
  ) -> Result<(), GraphError> {
    let output = self.registry.paired_output(input)?.ok_or_else(|| {
      GraphError::Consistency(format!("node of {} has no output to transform into", input))
    })?;
    let node = self.registry.lookup(input)?.node;
    if value.is_empty() {
      self.transforms.cancel(node);
      self.set_value(output, "")?;
      self.propagate(output)?;
      return Ok(());
    }
    self.transforms.schedule(TransformJob {
      node,
      output,
      text: value.to_string(),
      request,
      transform,
    })
  }

  fn apply_completion(&mut self, completion: TransformCompletion) -> Result<(), GraphError> {
    match completion.result {
      Ok(text) => {
        info!(node = %completion.node, output = %completion.output, "transform finished");
        self.set_value(completion.output, &text)?;
        self.propagate(completion.output)?;
        Ok(())
      }
      Err(e) => Err(GraphError::external_transform(completion.node, &e)),
    }
  }
}
