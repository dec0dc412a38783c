//! The translator graph: two source nodes, each feeding a translate-then-translate-back chain.
//!
//! ```text
//! EN Input ──> EN to JP ──> JP to EN
//! JP Input ──> JP to EN ──> EN to JP
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::declare::{AttributeDecl, NodeDecl, NodeEditorDecl, WidgetDecl};
use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::reaction::Reaction;
use crate::transform::{TextTransform, TransformRequest};
use crate::types::{WidgetKind, WidgetProperties};
use crate::widget::WidgetHost;

pub const WINDOW_LABEL: &str = "Node Editor";

const WIDGET_WIDTH: u32 = 300;
const WIDGET_HEIGHT: u32 = 100;

/// Tags of the two user-editable source attributes.
pub const SOURCE_TAGS: [&str; 2] = ["out_attr_1", "out_attr_2"];

fn text_box() -> WidgetDecl {
  WidgetDecl::input_text()
    .multiline()
    .with_size(WIDGET_WIDTH, WIDGET_HEIGHT)
}

fn source_node(label: &str, pos: (f32, f32), tag: &str) -> Result<NodeDecl, GraphError> {
  Ok(
    NodeDecl::new(label).at(pos.0, pos.1).add(
      AttributeDecl::output().with_tag(tag).add(
        text_box()
          .always_overwrite()
          .with_reaction(Reaction::propagate()),
      )?,
    ),
  )
}

fn translator_node(
  label: &str,
  pos: (f32, f32),
  tags: (&str, &str),
  transform: &Arc<dyn TextTransform>,
  request: TransformRequest,
) -> Result<NodeDecl, GraphError> {
  let input = AttributeDecl::input().with_tag(tags.0).add(
    text_box()
      .readonly()
      .with_reaction(Reaction::transform(transform.clone(), request)),
  )?;
  let output = AttributeDecl::output()
    .with_tag(tags.1)
    .add(text_box().readonly().with_reaction(Reaction::propagate()))?;
  Ok(NodeDecl::new(label).at(pos.0, pos.1).add(input).add(output))
}

/// Declares the translator graph around `transform`.
pub fn translator_layout(transform: Arc<dyn TextTransform>) -> Result<NodeEditorDecl, GraphError> {
  let en_ja = || TransformRequest::new("en", "ja");
  let ja_en = || TransformRequest::new("ja", "en");
  let decl = NodeEditorDecl::new()
    .add(source_node("EN Input", (0.0, 0.0), "out_attr_1")?)
    .add(translator_node(
      "EN to JP",
      (400.0, 0.0),
      ("en_to_ja_in_attr_1", "en_to_ja_out_attr_1"),
      &transform,
      en_ja(),
    )?)
    .add(translator_node(
      "JP to EN",
      (800.0, 0.0),
      ("ja_to_en_in_attr_1", "ja_to_en_out_attr_1"),
      &transform,
      ja_en(),
    )?)
    .add(source_node("JP Input", (0.0, 300.0), "out_attr_2")?)
    .add(translator_node(
      "JP to EN",
      (400.0, 300.0),
      ("ja_to_en_in_attr_2", "ja_to_en_out_attr_2"),
      &transform,
      ja_en(),
    )?)
    .add(translator_node(
      "EN to JP",
      (800.0, 300.0),
      ("en_to_ja_in_attr_2", "en_to_ja_out_attr_2"),
      &transform,
      en_ja(),
    )?)
    .link("out_attr_1", "en_to_ja_in_attr_1")
    .link("en_to_ja_out_attr_1", "ja_to_en_in_attr_1")
    .link("out_attr_2", "ja_to_en_in_attr_2")
    .link("ja_to_en_out_attr_2", "en_to_ja_in_attr_2");
  Ok(decl)
}

/// Builds the translator graph inside a new top-level window of `host`.
pub fn build_translator(
  mut host: Box<dyn WidgetHost>,
  transform: Arc<dyn TextTransform>,
  timeout: Option<Duration>,
) -> Result<NodeEditor, GraphError> {
  let window = host.add_widget(
    WidgetKind::Window,
    None,
    &WidgetProperties::labeled(WINDOW_LABEL),
  )?;
  translator_layout(transform)?
    .with_label(WINDOW_LABEL)
    .with_transform_timeout(timeout)
    .build(host, Some(window))
}
