//! Drives a [`NodeEditor`] from a stream of widget events.
//!
//! Events are dispatched one at a time. While the stream is idle, finished transforms are applied
//! as they arrive, so results show up without waiting for the next user action. Failures are
//! logged and counted; they never end the session.

use serde::Serialize;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info};

use crate::editor::NodeEditor;
use crate::error::GraphError;
use crate::widget::WidgetEvent;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventLoopReport {
  /// Widget events handled.
  pub processed: usize,
  /// Events whose handler returned an error.
  pub failed: usize,
  /// Transform results that could not be applied.
  pub transform_failures: usize,
}

/// Dispatches events into an editor and keeps the tally.
pub struct EventLoop<'a> {
  editor: &'a mut NodeEditor,
  report: EventLoopReport,
}

impl<'a> EventLoop<'a> {
  pub fn new(editor: &'a mut NodeEditor) -> Self {
    Self {
      editor,
      report: EventLoopReport::default(),
    }
  }

  pub fn editor(&self) -> &NodeEditor {
    &*self.editor
  }

  pub fn report(&self) -> &EventLoopReport {
    &self.report
  }

  /// Dispatches one event, logging a failure instead of returning it.
  pub fn handle(&mut self, event: WidgetEvent) {
    debug!(?event, "dispatching");
    self.report.processed += 1;
    if let Err(e) = self.editor.dispatch(event) {
      error!(error = %e, "event failed");
      self.report.failed += 1;
    }
    let failures = self.editor.take_failures();
    self.record_transform_failures(failures);
  }

  /// Records a failure raised outside `dispatch` (e.g. an unresolvable script tag).
  pub fn record_failure(&mut self, e: &GraphError) {
    error!(error = %e, "event failed");
    self.report.failed += 1;
  }

  /// Waits for every in-flight transform and applies the results.
  pub async fn settle(&mut self) {
    let failures = self.editor.settle().await;
    self.record_transform_failures(failures);
  }

  pub fn finish(self) -> EventLoopReport {
    self.report
  }

  fn record_transform_failures(&mut self, failures: Vec<GraphError>) {
    for e in &failures {
      error!(error = %e, "transform failed");
    }
    self.report.transform_failures += failures.len();
  }
}

enum Tick {
  Event(Option<WidgetEvent>),
  Applied(Option<Result<(), GraphError>>),
}

/// Runs `events` to the end, then settles outstanding transforms.
pub async fn run_events<S>(editor: &mut NodeEditor, events: S) -> EventLoopReport
where
  S: Stream<Item = WidgetEvent>,
{
  let mut events = std::pin::pin!(events);
  let mut event_loop = EventLoop::new(editor);
  loop {
    let pending = event_loop.editor.transforms().in_flight() > 0;
    let tick = tokio::select! {
      event = events.next() => Tick::Event(event),
      applied = event_loop.editor.apply_next(), if pending => Tick::Applied(applied),
    };
    match tick {
      Tick::Event(Some(event)) => event_loop.handle(event),
      Tick::Event(None) => break,
      Tick::Applied(Some(Err(e))) => event_loop.record_transform_failures(vec![e]),
      Tick::Applied(_) => {}
    }
  }
  event_loop.settle().await;
  let report = event_loop.finish();
  info!(
    processed = report.processed,
    failed = report.failed,
    transform_failures = report.transform_failures,
    "event stream finished"
  );
  report
}
