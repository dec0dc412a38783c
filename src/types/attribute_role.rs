//! Role of an attribute on a node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of an attribute. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRole {
  /// Receives links.
  Input,
  /// Feeds links.
  Output,
  /// Never participates in links.
  Static,
}

impl AttributeRole {
  /// Whether links may start or end at an attribute of this role.
  pub fn is_linkable(self) -> bool {
    !matches!(self, AttributeRole::Static)
  }
}

impl fmt::Display for AttributeRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AttributeRole::Input => write!(f, "input"),
      AttributeRole::Output => write!(f, "output"),
      AttributeRole::Static => write!(f, "static"),
    }
  }
}

impl FromStr for AttributeRole {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "input" => Ok(AttributeRole::Input),
      "output" => Ok(AttributeRole::Output),
      "static" => Ok(AttributeRole::Static),
      other => Err(format!("unknown attribute role '{}'", other)),
    }
  }
}
