//! Entity model of the attribute graph: handles, roles, attributes, nodes and links.

mod attribute;
mod attribute_role;
mod handle;
mod link_record;
mod node;
mod widget_kind;

pub use attribute::Attribute;
pub use attribute_role::AttributeRole;
pub use handle::{Handle, LinkId};
pub use link_record::LinkRecord;
pub use node::Node;
pub use widget_kind::{WidgetKind, WidgetProperties};

/// Scalar value stored by a value widget.
pub type Value = String;
