//! Runs transforms off the event path.
//!
//! A transform reaction hands a [`TransformJob`] to the scheduler and returns immediately. The job
//! runs as a tokio task; its [`TransformCompletion`] is queued and applied by the editor on the
//! next processed event (or an explicit `pump`/`settle`).
//!
//! One transform per node is live at a time. Scheduling a newer one cancels the older through the
//! node's [`CancellationToken`], and a generation number discards any result that still slips
//! through.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::GraphError;
use crate::types::Handle;

use super::{TextTransform, TransformError, TransformRequest};

/// A transform to run on behalf of `node`, writing into its `output` attribute.
pub(crate) struct TransformJob {
  pub node: Handle,
  pub output: Handle,
  pub text: String,
  pub request: TransformRequest,
  pub transform: Arc<dyn TextTransform>,
}

/// Result of a finished transform, waiting to be applied.
#[derive(Debug)]
pub(crate) struct TransformCompletion {
  pub node: Handle,
  pub output: Handle,
  pub generation: u64,
  pub result: Result<String, TransformError>,
}

struct InFlight {
  generation: u64,
  token: CancellationToken,
}

/// Spawns transform tasks and queues their results.
pub struct TransformScheduler {
  runtime: Option<RuntimeHandle>,
  timeout: Option<Duration>,
  sender: UnboundedSender<TransformCompletion>,
  receiver: UnboundedReceiver<TransformCompletion>,
  in_flight: HashMap<Handle, InFlight>,
  next_generation: u64,
}

impl Default for TransformScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl TransformScheduler {
  /// Scheduler that spawns onto the runtime current at scheduling time.
  pub fn new() -> Self {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      runtime: None,
      timeout: None,
      sender,
      receiver,
      in_flight: HashMap::new(),
      next_generation: 0,
    }
  }

  /// Pins the runtime transforms are spawned on.
  pub fn set_runtime(&mut self, runtime: RuntimeHandle) {
    self.runtime = Some(runtime);
  }

  /// Upper bound for a single transform; `None` waits indefinitely.
  pub fn set_timeout(&mut self, timeout: Option<Duration>) {
    self.timeout = timeout;
  }

  pub fn timeout(&self) -> Option<Duration> {
    self.timeout
  }

  /// Number of nodes with a transform in flight.
  pub fn in_flight(&self) -> usize {
    self.in_flight.len()
  }

  pub fn is_pending(&self, node: Handle) -> bool {
    self.in_flight.contains_key(&node)
  }

  pub(crate) fn schedule(&mut self, job: TransformJob) -> Result<(), GraphError> {
    let runtime = self
      .runtime
      .clone()
      .or_else(|| RuntimeHandle::try_current().ok())
      .ok_or_else(|| GraphError::ExternalTransform {
        node: job.node,
        reason: "no async runtime available for transforms".to_string(),
      })?;

    if let Some(previous) = self.in_flight.remove(&job.node) {
      debug!(
        node = %job.node,
        generation = previous.generation,
        "superseding in-flight transform"
      );
      previous.token.cancel();
    }

    self.next_generation += 1;
    let generation = self.next_generation;
    let token = CancellationToken::new();
    self.in_flight.insert(
      job.node,
      InFlight {
        generation,
        token: token.clone(),
      },
    );

    let sender = self.sender.clone();
    let timeout = self.timeout;
    debug!(
      node = %job.node,
      transform = job.transform.name(),
      request = %job.request,
      generation,
      "scheduling transform"
    );
    runtime.spawn(async move {
      let TransformJob {
        node,
        output,
        text,
        request,
        transform,
      } = job;
      let work = AssertUnwindSafe(run_transform(transform, text, request, timeout)).catch_unwind();
      let result = tokio::select! {
        _ = token.cancelled() => {
          trace!(%node, generation, "transform cancelled");
          return;
        }
        r = work => r.unwrap_or(Err(TransformError::Panicked)),
      };
      let _ = sender.send(TransformCompletion {
        node,
        output,
        generation,
        result,
      });
    });
    Ok(())
  }

  /// Abandons the transform in flight for `node`. Returns whether one was running.
  pub fn cancel(&mut self, node: Handle) -> bool {
    match self.in_flight.remove(&node) {
      Some(in_flight) => {
        in_flight.token.cancel();
        debug!(%node, generation = in_flight.generation, "transform cancelled");
        true
      }
      None => false,
    }
  }

  /// Next queued completion that is still current, without waiting.
  pub(crate) fn try_next(&mut self) -> Option<TransformCompletion> {
    while let Ok(completion) = self.receiver.try_recv() {
      if self.accept(&completion) {
        return Some(completion);
      }
    }
    None
  }

  /// Waits for the next current completion. `None` once nothing is in flight.
  pub(crate) async fn next(&mut self) -> Option<TransformCompletion> {
    while !self.in_flight.is_empty() {
      let completion = self.receiver.recv().await?;
      if self.accept(&completion) {
        return Some(completion);
      }
    }
    None
  }

  fn accept(&mut self, completion: &TransformCompletion) -> bool {
    match self.in_flight.get(&completion.node) {
      Some(current) if current.generation == completion.generation => {
        self.in_flight.remove(&completion.node);
        true
      }
      _ => {
        trace!(
          node = %completion.node,
          generation = completion.generation,
          "discarding stale transform result"
        );
        false
      }
    }
  }
}

impl Drop for TransformScheduler {
  fn drop(&mut self) {
    for in_flight in self.in_flight.values() {
      in_flight.token.cancel();
    }
  }
}

async fn run_transform(
  transform: Arc<dyn TextTransform>,
  text: String,
  request: TransformRequest,
  timeout: Option<Duration>,
) -> Result<String, TransformError> {
  match timeout {
    Some(limit) => tokio::time::timeout(limit, transform.transform(&text, &request))
      .await
      .map_err(|_| TransformError::TimedOut(limit))?,
    None => transform.transform(&text, &request).await,
  }
}
