//! A directed edge between an output and an input attribute.

use serde::Serialize;

use super::{Handle, LinkId};

/// Directed edge `source (Output) -> destination (Input)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
  pub id: LinkId,
  pub source: Handle,
  pub destination: Handle,
}
