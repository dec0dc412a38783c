//! Link index and per-attribute link bookkeeping.
//!
//! The table keeps a direct `LinkId -> LinkRecord` index so removal does not scan every attribute,
//! and mirrors each record into the two attributes it touches (`incoming_links` on the
//! destination, `outgoing_links` on the source). Both views are updated together.

use std::collections::HashMap;

use tracing::trace;

use crate::error::GraphError;
use crate::registry::Registry;
use crate::types::{AttributeRole, Handle, LinkId, LinkRecord};

/// Link index plus per-attribute link lists (stored on the attributes in the [`Registry`]).
#[derive(Debug, Default)]
pub struct LinkTable {
  links: HashMap<LinkId, LinkRecord>,
}

impl LinkTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Checks that `source -> destination` is a legal link: both registered, Output -> Input.
  pub fn validate(
    registry: &Registry,
    source: Handle,
    destination: Handle,
  ) -> Result<(), GraphError> {
    let src = registry.lookup(source)?;
    let dst = registry.lookup(destination)?;
    if src.role != AttributeRole::Output {
      return Err(GraphError::Consistency(format!(
        "link source {} is an {} attribute, expected output",
        src.name(),
        src.role
      )));
    }
    if dst.role != AttributeRole::Input {
      return Err(GraphError::Consistency(format!(
        "link destination {} is an {} attribute, expected input",
        dst.name(),
        dst.role
      )));
    }
    Ok(())
  }

  /// Records a link minted by the widget layer.
  pub fn insert(&mut self, registry: &mut Registry, record: LinkRecord) -> Result<(), GraphError> {
    Self::validate(registry, record.source, record.destination)?;
    if self.links.contains_key(&record.id) {
      return Err(GraphError::Consistency(format!(
        "{} is already live",
        record.id
      )));
    }
    registry
      .lookup_mut(record.destination)?
      .incoming_links
      .insert(record.id, record.source);
    registry
      .lookup_mut(record.source)?
      .outgoing_links
      .push(record.id);
    self.links.insert(record.id, record);
    trace!(
      link = %record.id,
      source = %record.source,
      destination = %record.destination,
      "link recorded"
    );
    Ok(())
  }

  /// Removes a link. An unknown id is a no-op and returns `None`.
  pub fn remove(&mut self, registry: &mut Registry, link: LinkId) -> Option<LinkRecord> {
    let record = self.links.remove(&link)?;
    if let Ok(destination) = registry.lookup_mut(record.destination) {
      destination.incoming_links.remove(&link);
    }
    if let Ok(source) = registry.lookup_mut(record.source) {
      source.outgoing_links.retain(|l| *l != link);
    }
    trace!(%link, "link removed");
    Some(record)
  }

  pub fn get(&self, link: LinkId) -> Option<&LinkRecord> {
    self.links.get(&link)
  }

  /// Links fed by `source`, in creation order.
  pub fn outgoing(
    &self,
    registry: &Registry,
    source: Handle,
  ) -> Result<Vec<LinkRecord>, GraphError> {
    registry
      .lookup(source)?
      .outgoing_links
      .iter()
      .map(|link| {
        self.links.get(link).copied().ok_or_else(|| {
          GraphError::Consistency(format!("{} listed on {} but not indexed", link, source))
        })
      })
      .collect()
  }

  /// First live link from `source` to `destination`.
  pub fn between(&self, source: Handle, destination: Handle) -> Option<LinkId> {
    self
      .links
      .values()
      .filter(|r| r.source == source && r.destination == destination)
      .map(|r| r.id)
      .min()
  }

  pub fn len(&self) -> usize {
    self.links.len()
  }

  pub fn is_empty(&self) -> bool {
    self.links.is_empty()
  }
}
