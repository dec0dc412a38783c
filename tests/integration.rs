//! Integration tests for the attribute graph through the public API: declaration, linking,
//! single-hop propagation and node teardown on a headless host.

use std::sync::Arc;

use node_translator::{
  AttributeDecl, GraphError, HeadlessHost, NodeDecl, NodeEditor, NodeEditorDecl, Reaction,
  WidgetDecl, WidgetEvent,
};

fn output(tag: &str) -> NodeDecl {
  NodeDecl::new("Output").add(
    AttributeDecl::output()
      .with_tag(tag)
      .add(WidgetDecl::input_text().with_reaction(Reaction::propagate()))
      .expect("empty slot"),
  )
}

fn input(tag: &str) -> NodeDecl {
  NodeDecl::new("Input").add(
    AttributeDecl::input()
      .with_tag(tag)
      .add(WidgetDecl::text())
      .expect("empty slot"),
  )
}

fn build(decl: NodeEditorDecl) -> NodeEditor {
  decl
    .build(Box::new(HeadlessHost::new()), None)
    .expect("valid declaration")
}

fn value(editor: &NodeEditor, tag: &str) -> String {
  let handle = editor.resolve_tag(tag).expect("tag");
  editor.get_value(handle).expect("value")
}

#[test]
fn hello_world_then_delink() {
  let mut editor = build(NodeEditorDecl::new().add(output("src")).add(input("dst")));
  let src = editor.resolve_tag("src").unwrap();
  let dst = editor.resolve_tag("dst").unwrap();

  editor.set_value(src, "hello").unwrap();
  let link = editor.create_link(src, dst).unwrap();
  assert_eq!(value(&editor, "dst"), "hello");

  editor.set_value(src, "world").unwrap();
  editor.propagate(src).unwrap();
  assert_eq!(value(&editor, "dst"), "world");

  assert!(editor.delete_link(link).unwrap().is_some());
  assert!(editor.delete_link(link).unwrap().is_none());
  editor.set_value(src, "again").unwrap();
  editor.propagate(src).unwrap();
  assert_eq!(value(&editor, "dst"), "world");
}

#[test]
fn two_destinations_receive_the_same_value() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output("src"))
      .add(input("dst1"))
      .add(input("dst2"))
      .link("src", "dst1")
      .link("src", "dst2"),
  );
  let src = editor.resolve_tag("src").unwrap();
  editor
    .dispatch(WidgetEvent::ValueCommitted {
      item: src,
      value: "x".to_string(),
    })
    .unwrap();
  assert_eq!(value(&editor, "dst1"), "x");
  assert_eq!(value(&editor, "dst2"), "x");
}

#[test]
fn declaration_errors_are_configuration_errors() {
  let err = AttributeDecl::input()
    .add(WidgetDecl::text())
    .unwrap()
    .add(WidgetDecl::text())
    .unwrap_err();
  assert!(matches!(err, GraphError::Configuration(_)));

  let err = NodeEditorDecl::new()
    .add(output("src"))
    .link("src", "ghost")
    .build(Box::new(HeadlessHost::new()), None)
    .err()
    .expect("dangling link tag");
  assert!(err.is_configuration());
}

#[test]
fn reaction_can_continue_the_chain_explicitly() {
  let shout = Reaction::new(
    |editor, input, value, context| {
      let suffix = context.downcast_ref::<String>().cloned().unwrap_or_default();
      let output = editor
        .registry()
        .paired_output(input)?
        .ok_or_else(|| GraphError::Consistency("no output".to_string()))?;
      editor.set_value(output, &format!("{}{}", value.to_uppercase(), suffix))?;
      editor.propagate(output).map(|_| ())
    },
    Arc::new("!".to_string()),
  );
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output("src"))
      .add(
        NodeDecl::new("Shout")
          .add(
            AttributeDecl::input()
              .with_tag("shout_in")
              .add(WidgetDecl::text().with_reaction(shout))
              .unwrap(),
          )
          .add(
            AttributeDecl::output()
              .with_tag("shout_out")
              .add(WidgetDecl::text())
              .unwrap(),
          ),
      )
      .add(input("end"))
      .link("src", "shout_in")
      .link("shout_out", "end"),
  );
  let src = editor.resolve_tag("src").unwrap();
  editor.on_value_committed(src, "hey").unwrap();
  assert_eq!(value(&editor, "shout_out"), "HEY!");
  assert_eq!(value(&editor, "end"), "HEY!");
}

#[test]
fn removed_node_is_gone_from_every_view() {
  let mut editor = build(
    NodeEditorDecl::new()
      .add(output("src"))
      .add(input("dst"))
      .link("src", "dst"),
  );
  let dst = editor.resolve_tag("dst").unwrap();
  let node = editor.attribute(dst).unwrap().node;
  editor.remove_node(node).unwrap();

  assert!(editor.links().is_empty());
  assert!(editor.get_value(dst).unwrap_err().is_consistency());
  let src = editor.resolve_tag("src").unwrap();
  editor.on_value_committed(src, "still fine").unwrap();
  assert_eq!(value(&editor, "src"), "still fine");
}
