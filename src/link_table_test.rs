//! Tests for `LinkTable`.

use crate::link_table::LinkTable;
use crate::registry::Registry;
use crate::types::{Attribute, AttributeRole, Handle, LinkId, LinkRecord, Node};

/// Source node #1 with output #2; sink nodes #10 and #20 with inputs #11 and #21.
fn fan_out_registry() -> Registry {
  let mut r = Registry::new();
  for (node, attr, role) in [
    (1, 2, AttributeRole::Output),
    (10, 11, AttributeRole::Input),
    (20, 21, AttributeRole::Input),
  ] {
    let mut n = Node::new(Handle(node), format!("node {}", node));
    n.attributes.push(Handle(attr));
    r.register_node(n).unwrap();
    r.register(Attribute::new(Handle(attr), role, Handle(node)))
      .unwrap();
  }
  r
}

fn record(id: u64, source: u64, destination: u64) -> LinkRecord {
  LinkRecord {
    id: LinkId(id),
    source: Handle(source),
    destination: Handle(destination),
  }
}

#[test]
fn insert_updates_both_attributes() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 11)).unwrap();
  assert_eq!(r.lookup(Handle(2)).unwrap().outgoing_links(), &[LinkId(100)]);
  assert_eq!(
    r.lookup(Handle(11)).unwrap().incoming_links().get(&LinkId(100)),
    Some(&Handle(2))
  );
  assert_eq!(t.len(), 1);
}

#[test]
fn fan_out_keeps_creation_order() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 21)).unwrap();
  t.insert(&mut r, record(101, 2, 11)).unwrap();
  let out = t.outgoing(&r, Handle(2)).unwrap();
  let destinations: Vec<Handle> = out.iter().map(|l| l.destination).collect();
  assert_eq!(destinations, vec![Handle(21), Handle(11)]);
}

#[test]
fn insert_rejects_wrong_roles() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  assert!(t.insert(&mut r, record(100, 11, 2)).unwrap_err().is_consistency());
  assert!(t.insert(&mut r, record(100, 11, 21)).unwrap_err().is_consistency());
  assert!(t.is_empty());
}

#[test]
fn insert_rejects_unknown_handles() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  assert!(t.insert(&mut r, record(100, 2, 99)).is_err());
  assert!(r.lookup(Handle(2)).unwrap().outgoing_links().is_empty());
}

#[test]
fn insert_rejects_live_id() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 11)).unwrap();
  assert!(t.insert(&mut r, record(100, 2, 21)).is_err());
  assert!(r.lookup(Handle(21)).unwrap().incoming_links().is_empty());
}

#[test]
fn remove_deletes_exactly_one_entry() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 11)).unwrap();
  t.insert(&mut r, record(101, 2, 21)).unwrap();

  let removed = t.remove(&mut r, LinkId(100)).unwrap();
  assert_eq!(removed.destination, Handle(11));

  let incoming_total: usize = r.attributes().map(|a| a.incoming_links().len()).sum();
  assert_eq!(incoming_total, 1);
  assert_eq!(r.lookup(Handle(2)).unwrap().outgoing_links(), &[LinkId(101)]);
  assert!(t.get(LinkId(100)).is_none());
}

#[test]
fn remove_unknown_id_is_noop() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 11)).unwrap();
  assert!(t.remove(&mut r, LinkId(7)).is_none());
  assert!(t.remove(&mut r, LinkId(100)).is_some());
  assert!(t.remove(&mut r, LinkId(100)).is_none());
  assert!(t.is_empty());
}

#[test]
fn between_finds_live_link() {
  let mut r = fan_out_registry();
  let mut t = LinkTable::new();
  t.insert(&mut r, record(100, 2, 11)).unwrap();
  assert_eq!(t.between(Handle(2), Handle(11)), Some(LinkId(100)));
  assert_eq!(t.between(Handle(2), Handle(21)), None);
}
