//! Tests for single-hop propagation.

use proptest::prelude::*;

use crate::declare::{AttributeDecl, NodeDecl, NodeEditorDecl, WidgetDecl};
use crate::editor::NodeEditor;
use crate::headless::HeadlessHost;
use crate::reaction::Reaction;
use crate::types::{AttributeRole, Handle};

fn output_node(tag: &str) -> NodeDecl {
  NodeDecl::new("Out").add(
    AttributeDecl::output()
      .with_tag(tag)
      .add(WidgetDecl::input_text())
      .unwrap(),
  )
}

fn input_node(tag: &str) -> NodeDecl {
  NodeDecl::new("In").add(
    AttributeDecl::input()
      .with_tag(tag)
      .add(WidgetDecl::text())
      .unwrap(),
  )
}

fn build(decl: NodeEditorDecl) -> NodeEditor {
  decl.build(Box::new(HeadlessHost::new()), None).unwrap()
}

fn tag(editor: &NodeEditor, tag: &str) -> Handle {
  editor.resolve_tag(tag).unwrap()
}

fn value(editor: &NodeEditor, name: &str) -> String {
  editor.get_value(tag(editor, name)).unwrap()
}

#[test]
fn hello_world_scenario() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output_node("src"))
      .add(input_node("dst")),
  );
  let (src, dst) = (tag(&editor, "src"), tag(&editor, "dst"));
  editor.set_value(src, "hello").unwrap();
  editor.create_link(src, dst).unwrap();
  assert_eq!(value(&editor, "dst"), "hello");

  editor.set_value(src, "world").unwrap();
  let report = editor.propagate(src).unwrap();
  assert_eq!(value(&editor, "dst"), "world");
  assert_eq!(report.updated, vec![dst]);
  assert!(report.reacted.is_empty());
}

#[test]
fn delink_scenario_leaves_destination_unchanged() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output_node("src"))
      .add(input_node("dst")),
  );
  let (src, dst) = (tag(&editor, "src"), tag(&editor, "dst"));
  editor.set_value(src, "world").unwrap();
  let link = editor.create_link(src, dst).unwrap();
  editor.delete_link(link).unwrap();

  editor.set_value(src, "again").unwrap();
  let report = editor.propagate(src).unwrap();
  assert!(report.is_empty());
  assert_eq!(value(&editor, "dst"), "world");
}

#[test]
fn two_destination_scenario() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output_node("src"))
      .add(input_node("dst1"))
      .add(input_node("dst2"))
      .link("src", "dst1")
      .link("src", "dst2"),
  );
  let src = tag(&editor, "src");
  editor.set_value(src, "x").unwrap();
  editor.propagate(src).unwrap();
  assert_eq!(value(&editor, "dst1"), "x");
  assert_eq!(value(&editor, "dst2"), "x");
}

#[test]
fn propagation_stops_after_one_hop() {
  // o1 -> [i1 | o2] -> i3, and the middle node has no reaction.
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output_node("o1"))
      .add(
        NodeDecl::new("Middle")
          .add(
            AttributeDecl::input()
              .with_tag("i1")
              .add(WidgetDecl::text())
              .unwrap(),
          )
          .add(
            AttributeDecl::output()
              .with_tag("o2")
              .add(WidgetDecl::text())
              .unwrap(),
          ),
      )
      .add(input_node("i3"))
      .link("o1", "i1")
      .link("o2", "i3"),
  );
  let (o1, o2) = (tag(&editor, "o1"), tag(&editor, "o2"));
  editor.set_value(o2, "middle").unwrap();
  editor.set_value(o1, "first").unwrap();

  let report = editor.propagate(o1).unwrap();
  assert_eq!(report.updated, vec![tag(&editor, "i1")]);
  assert_eq!(value(&editor, "i1"), "first");
  assert_eq!(value(&editor, "i3"), "");

  // Only an explicit call from the middle node moves the value on.
  editor.propagate(o2).unwrap();
  assert_eq!(value(&editor, "i3"), "middle");
}

#[test]
fn input_originated_propagation_uses_paired_output() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(
        NodeDecl::new("Middle")
          .add(
            AttributeDecl::input()
              .with_tag("in")
              .add(WidgetDecl::text())
              .unwrap(),
          )
          .add(
            AttributeDecl::output()
              .with_tag("out")
              .add(WidgetDecl::text())
              .unwrap(),
          ),
      )
      .add(input_node("next"))
      .link("out", "next"),
  );
  let (input, out) = (tag(&editor, "in"), tag(&editor, "out"));
  editor.set_value(out, "from out").unwrap();
  let report = editor.propagate(input).unwrap();
  assert_eq!(report.updated, vec![tag(&editor, "next")]);
  assert_eq!(value(&editor, "next"), "from out");
}

#[test]
fn input_on_sink_node_is_noop() {
  let mut editor = build(NodeEditorDecl::new().add(input_node("alone")));
  let report = editor.propagate(tag(&editor, "alone")).unwrap();
  assert!(report.is_empty());
}

#[test]
fn static_attribute_is_noop() {
  let mut editor = build(
    NodeEditorDecl::new().add(
      NodeDecl::new("Label").add(
        AttributeDecl::new(AttributeRole::Static)
          .with_tag("note")
          .add(WidgetDecl::text().with_default_value("static"))
          .unwrap(),
      ),
    ),
  );
  let report = editor.propagate(tag(&editor, "note")).unwrap();
  assert!(report.is_empty());
  assert_eq!(value(&editor, "note"), "static");
}

#[test]
fn reactions_run_after_value_is_stored() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output_node("src"))
      .add(
        NodeDecl::new("Checked").add(
          AttributeDecl::input()
            .with_tag("checked")
            .add(WidgetDecl::text().with_reaction(Reaction::from_fn(
              |editor, attribute, value, _context| {
                assert_eq!(editor.get_value(attribute)?, value);
                Ok(())
              },
            )))
            .unwrap(),
        ),
      )
      .add(input_node("plain"))
      .link("src", "checked")
      .link("src", "plain"),
  );
  let src = tag(&editor, "src");
  editor.set_value(src, "seen").unwrap();
  let report = editor.propagate(src).unwrap();
  assert_eq!(report.updated.len(), 2);
  assert_eq!(report.reacted, vec![tag(&editor, "checked")]);
}

#[test]
fn propagate_unknown_handle_is_consistency_error() {
  let mut editor = build(NodeEditorDecl::new().add(output_node("src")));
  assert!(editor.propagate(Handle(4_040)).unwrap_err().is_consistency());
}

proptest! {
  #[test]
  fn fan_out_reaches_every_destination(fan in 1usize..8, text in "[a-z ]{0,16}") {
    let mut decl = NodeEditorDecl::new().add(output_node("src"));
    for i in 0..fan {
      let name = format!("dst{}", i);
      decl = decl.add(input_node(&name)).link("src", name);
    }
    let mut editor = build(decl);
    let src = tag(&editor, "src");
    editor.set_value(src, &text).unwrap();
    let report = editor.propagate(src).unwrap();

    prop_assert_eq!(report.updated.len(), fan);
    for i in 0..fan {
      let dst = tag(&editor, &format!("dst{}", i));
      prop_assert_eq!(report.updated[i], dst);
      prop_assert_eq!(editor.get_value(dst).unwrap(), text.clone());
    }
  }
}
