//! Declarative entity builder.
//!
//! A graph is declared as a tree (`NodeEditorDecl` > `NodeDecl` > `AttributeDecl` > `WidgetDecl`)
//! plus links between tagged attributes, then built in one pass against a [`WidgetHost`]. Building
//! consumes the declaration, so the same entity cannot be built twice.
//!
//! Configuration errors (abstract kinds, a second widget in an attribute, dangling link tags,
//! reactions an attribute cannot carry) are reported before the host mints any handle for the
//! declaration being built.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, instrument};

use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::reaction::{Reaction, ReactionRequirement};
use crate::types::{Attribute, AttributeRole, Handle, Node, WidgetKind, WidgetProperties};
use crate::widget::WidgetHost;

/// The value widget held by an attribute.
#[derive(Debug, Clone)]
pub struct WidgetDecl {
  kind: WidgetKind,
  properties: WidgetProperties,
  reaction: Option<Reaction>,
}

impl WidgetDecl {
  /// Declares a widget of `kind`. Only concrete value-capable kinds can sit in an attribute.
  pub fn new(kind: WidgetKind) -> Result<Self, GraphError> {
    if !kind.is_instantiable() {
      return Err(GraphError::Configuration(format!(
        "'{}' is abstract and cannot be built directly",
        kind
      )));
    }
    if !kind.is_value_capable() {
      return Err(GraphError::Configuration(format!(
        "'{}' cannot be placed in an attribute slot",
        kind
      )));
    }
    Ok(Self {
      kind,
      properties: WidgetProperties::default(),
      reaction: None,
    })
  }

  pub fn input_text() -> Self {
    Self {
      kind: WidgetKind::InputText,
      properties: WidgetProperties::default(),
      reaction: None,
    }
  }

  pub fn text() -> Self {
    Self {
      kind: WidgetKind::Text,
      properties: WidgetProperties::default(),
      reaction: None,
    }
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.properties.label = Some(label.into());
    self
  }

  pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
    self.properties.default_value = Some(value.into());
    self
  }

  pub fn multiline(mut self) -> Self {
    self.properties.multiline = true;
    self
  }

  pub fn readonly(mut self) -> Self {
    self.properties.readonly = true;
    self
  }

  pub fn always_overwrite(mut self) -> Self {
    self.properties.always_overwrite = true;
    self
  }

  pub fn with_size(mut self, width: u32, height: u32) -> Self {
    self.properties.width = Some(width);
    self.properties.height = Some(height);
    self
  }

  pub fn with_reaction(mut self, reaction: Reaction) -> Self {
    self.reaction = Some(reaction);
    self
  }

  pub fn kind(&self) -> WidgetKind {
    self.kind
  }

  pub fn properties(&self) -> &WidgetProperties {
    &self.properties
  }
}

/// A connectable slot; holds at most one widget.
#[derive(Debug, Clone)]
pub struct AttributeDecl {
  role: AttributeRole,
  tag: Option<String>,
  widget: Option<WidgetDecl>,
}

impl AttributeDecl {
  pub fn new(role: AttributeRole) -> Self {
    Self {
      role,
      tag: None,
      widget: None,
    }
  }

  pub fn input() -> Self {
    Self::new(AttributeRole::Input)
  }

  pub fn output() -> Self {
    Self::new(AttributeRole::Output)
  }

  pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
    self.tag = Some(tag.into());
    self
  }

  /// Places `widget` in the slot. A second widget is a configuration error.
  pub fn add(mut self, widget: WidgetDecl) -> Result<Self, GraphError> {
    if let Some(existing) = &self.widget {
      return Err(GraphError::Configuration(format!(
        "{} attribute{} already holds a {} widget",
        self.role,
        self
          .tag
          .as_deref()
          .map(|t| format!(" '{}'", t))
          .unwrap_or_default(),
        existing.kind
      )));
    }
    self.widget = Some(widget);
    Ok(self)
  }

  pub fn role(&self) -> AttributeRole {
    self.role
  }

  pub fn tag(&self) -> Option<&str> {
    self.tag.as_deref()
  }

  pub fn widget(&self) -> Option<&WidgetDecl> {
    self.widget.as_ref()
  }
}

/// A node and its attributes, in presentation order.
#[derive(Debug, Clone)]
pub struct NodeDecl {
  label: String,
  pos: (f32, f32),
  attributes: Vec<AttributeDecl>,
}

impl NodeDecl {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      pos: (0.0, 0.0),
      attributes: Vec::new(),
    }
  }

  pub fn at(mut self, x: f32, y: f32) -> Self {
    self.pos = (x, y);
    self
  }

  pub fn add(mut self, attribute: AttributeDecl) -> Self {
    self.attributes.push(attribute);
    self
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn attributes(&self) -> &[AttributeDecl] {
    &self.attributes
  }

  /// Checks the node against the tags already taken and records its own tags and roles.
  fn validate(&self, roles: &mut HashMap<String, AttributeRole>) -> Result<(), GraphError> {
    for attribute in &self.attributes {
      if attribute.role.is_linkable() && attribute.widget.is_none() {
        return Err(GraphError::Configuration(format!(
          "{} attribute on node '{}' needs a value widget",
          attribute.role, self.label
        )));
      }
      let reaction = attribute.widget.as_ref().and_then(|w| w.reaction.as_ref());
      if let Some(reaction) = reaction {
        self.validate_reaction(attribute, reaction)?;
      }
      if let Some(tag) = &attribute.tag {
        if roles.insert(tag.clone(), attribute.role).is_some() {
          return Err(GraphError::Configuration(format!(
            "tag '{}' is declared twice",
            tag
          )));
        }
      }
    }
    Ok(())
  }

  fn validate_reaction(
    &self,
    attribute: &AttributeDecl,
    reaction: &Reaction,
  ) -> Result<(), GraphError> {
    if reaction.requirement() != ReactionRequirement::PairedOutput {
      return Ok(());
    }
    if attribute.role != AttributeRole::Input {
      return Err(GraphError::Configuration(format!(
        "{} reaction needs an input attribute, node '{}' declares it on its {} attribute",
        reaction.kind(),
        self.label,
        attribute.role
      )));
    }
    if !self
      .attributes
      .iter()
      .any(|a| a.role == AttributeRole::Output)
    {
      return Err(GraphError::Configuration(format!(
        "{} reaction on node '{}' needs an output on the same node",
        reaction.kind(),
        self.label
      )));
    }
    Ok(())
  }

  /// Builds the node into an already built editor.
  pub fn build(self, editor: &mut NodeEditor) -> Result<Handle, GraphError> {
    let mut roles = existing_roles(editor)?;
    self.validate(&mut roles)?;
    self.materialize(editor)
  }

  fn materialize(self, editor: &mut NodeEditor) -> Result<Handle, GraphError> {
    let node_props = WidgetProperties {
      label: Some(self.label.clone()),
      pos: Some(self.pos),
      ..WidgetProperties::default()
    };
    let parent = editor.handle();
    let node_handle = editor
      .host
      .add_widget(WidgetKind::Node, Some(parent), &node_props)?;
    let mut node = Node::new(node_handle, &self.label);
    node.pos = self.pos;

    let mut reactions = Vec::new();
    for decl in self.attributes {
      let attr_props = WidgetProperties {
        tag: decl.tag.clone(),
        ..WidgetProperties::default()
      };
      let attr_handle = editor.host.add_widget(
        WidgetKind::NodeAttribute(decl.role),
        Some(node_handle),
        &attr_props,
      )?;
      let mut attribute = Attribute::new(attr_handle, decl.role, node_handle);
      if let Some(widget) = decl.widget {
        let widget_handle =
          editor
            .host
            .add_widget(widget.kind, Some(attr_handle), &widget.properties)?;
        if let Some(value) = &widget.properties.default_value {
          editor.host.set_value(widget_handle, value)?;
        }
        attribute = attribute.with_widget(widget_handle);
        if let Some(reaction) = widget.reaction {
          reactions.push((attr_handle, reaction));
        }
      }
      if let Some(tag) = &decl.tag {
        attribute = attribute.with_tag(tag);
        editor.register_tag(tag, attr_handle)?;
      }
      editor.registry.register(attribute)?;
      node.attributes.push(attr_handle);
    }
    editor.registry.register_node(node)?;

    // Registered last so the paired output already resolves.
    for (attribute, reaction) in reactions {
      editor.register_reaction(attribute, reaction)?;
    }
    Ok(node_handle)
  }
}

/// A link between two tagged attributes, connected right after the nodes are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDecl {
  pub source: String,
  pub destination: String,
}

/// Root declaration: the editor, its nodes and its initial links.
#[derive(Debug, Clone, Default)]
pub struct NodeEditorDecl {
  properties: WidgetProperties,
  nodes: Vec<NodeDecl>,
  links: Vec<LinkDecl>,
  transform_timeout: Option<Duration>,
}

impl NodeEditorDecl {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.properties.label = Some(label.into());
    self
  }

  pub fn add(mut self, node: NodeDecl) -> Self {
    self.nodes.push(node);
    self
  }

  pub fn link(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
    self.links.push(LinkDecl {
      source: source.into(),
      destination: destination.into(),
    });
    self
  }

  /// Timeout applied to transforms, including the ones triggered by the initial links.
  pub fn with_transform_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.transform_timeout = timeout;
    self
  }

  pub fn nodes(&self) -> &[NodeDecl] {
    &self.nodes
  }

  pub fn links(&self) -> &[LinkDecl] {
    &self.links
  }

  /// Checks the whole declaration without touching any host.
  pub fn validate(&self) -> Result<(), GraphError> {
    let mut roles = HashMap::new();
    for node in &self.nodes {
      node.validate(&mut roles)?;
    }
    for link in &self.links {
      let source = roles.get(&link.source).ok_or_else(|| {
        GraphError::Configuration(format!("link source tag '{}' is not declared", link.source))
      })?;
      let destination = roles.get(&link.destination).ok_or_else(|| {
        GraphError::Configuration(format!(
          "link destination tag '{}' is not declared",
          link.destination
        ))
      })?;
      if *source != AttributeRole::Output || *destination != AttributeRole::Input {
        return Err(GraphError::Configuration(format!(
          "link '{}' -> '{}' must run from an output to an input",
          link.source, link.destination
        )));
      }
    }
    Ok(())
  }

  /// Builds the editor under `parent`, registers every attribute and reaction, then connects the
  /// declared links (each one syncs its value and propagates, as a user-drawn link would).
  #[instrument(level = "debug", skip_all, fields(parent = ?parent))]
  pub fn build(
    self,
    mut host: Box<dyn WidgetHost>,
    parent: Option<Handle>,
  ) -> Result<NodeEditor, GraphError> {
    self.validate()?;
    let handle = host.add_widget(WidgetKind::NodeEditor, parent, &self.properties)?;
    let mut editor = NodeEditor::new(handle, host);
    editor.transforms_mut().set_timeout(self.transform_timeout);

    let node_count = self.nodes.len();
    for node in self.nodes {
      node.materialize(&mut editor)?;
    }
    for link in &self.links {
      let source = editor.resolve_tag(&link.source)?;
      let destination = editor.resolve_tag(&link.destination)?;
      editor.on_link(source, destination)?;
    }
    info!(
      editor = %handle,
      nodes = node_count,
      attributes = editor.registry().len(),
      links = editor.links().len(),
      "node editor built"
    );
    Ok(editor)
  }
}

fn existing_roles(editor: &NodeEditor) -> Result<HashMap<String, AttributeRole>, GraphError> {
  let mut roles = HashMap::new();
  for (tag, handle) in editor.tags() {
    roles.insert(tag, editor.registry().lookup(handle)?.role);
  }
  Ok(roles)
}

impl NodeEditor {
  /// Builds one more node into the editor.
  pub fn add_node(&mut self, node: NodeDecl) -> Result<Handle, GraphError> {
    node.build(self)
  }
}
