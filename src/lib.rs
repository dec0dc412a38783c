//! # node-translator
//!
//! Attribute graph and value-propagation engine for node-based editors whose nodes transform
//! text, plus the two-way English/Japanese translator built on it.
//!
//! ## Architecture
//!
//! A graph is declared with the [`declare`] builders and built against a [`WidgetHost`] (the
//! rendering layer; [`HeadlessHost`] keeps everything in memory). Building yields a
//! [`NodeEditor`], which owns:
//!
//! - the [`Registry`] (handle -> attribute, node membership),
//! - the [`LinkTable`] (link index plus per-attribute link lists),
//! - the reactions registered on attributes,
//! - the [`TransformScheduler`] running text transforms off the event path.
//!
//! Widget events go through [`NodeEditor::dispatch`]. Propagation is single-hop: a linked input
//! receives the new value and runs its reaction; anything further happens only because that
//! reaction propagated again (see [`propagation`]).

pub mod config;
pub mod declare;
pub mod editor;
pub mod error;
pub mod event_loop;
pub mod headless;
pub mod layout;
pub mod link_table;
#[cfg(test)]
mod link_table_test;
pub mod propagation;
#[cfg(test)]
mod propagation_test;
pub mod reaction;
pub mod registry;
pub mod script;
pub mod transform;
pub mod types;
pub mod widget;

pub use config::{AppConfig, ConfigError, ConfigFlags, TransformSource};
pub use declare::{AttributeDecl, LinkDecl, NodeDecl, NodeEditorDecl, WidgetDecl};
pub use editor::NodeEditor;
pub use error::GraphError;
pub use event_loop::{EventLoop, EventLoopReport, run_events};
pub use headless::HeadlessHost;
pub use layout::{build_translator, translator_layout};
pub use link_table::LinkTable;
pub use propagation::Propagation;
pub use reaction::{Reaction, ReactionContext, ReactionRequirement};
pub use registry::Registry;
pub use script::{ScriptCommand, ScriptError, parse_script, run_script};
pub use transform::{
  CommandTransform, GlossaryTransform, TextTransform, TransformError, TransformRequest,
  TransformScheduler,
};
pub use types::{Attribute, AttributeRole, Handle, LinkId, LinkRecord, Node, Value, WidgetKind};
pub use widget::{WidgetEvent, WidgetHost};
