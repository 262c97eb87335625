use std::sync::Arc;

use tokio::sync::oneshot;
use trellis_navigator::Task;
use trellis_result::SchemaInfo;

use crate::error::FetchError;
use crate::transformer::TaskTransformer;

/// Handle to a detached, in-flight task fetch.
///
/// The outcome is delivered through a oneshot channel, so exactly one
/// delivery is guaranteed by the type rather than by convention. The
/// handle carries the requested task identifier so a caller can check an
/// arriving outcome for relevance ("is this still the active task?")
/// instead of cancelling.
pub struct PendingTask {
  task_identifier: String,
  rx: oneshot::Receiver<Result<Task, FetchError>>,
}

impl PendingTask {
  /// The identifier this fetch was started for.
  pub fn task_identifier(&self) -> &str {
    &self.task_identifier
  }

  /// Wait for the fetch outcome.
  ///
  /// Resolves exactly once; a fetch worker that dies before delivering
  /// surfaces as an `Unknown` error.
  pub async fn await_task(self) -> Result<Task, FetchError> {
    match self.rx.await {
      Ok(outcome) => outcome,
      Err(_) => Err(FetchError::unknown(
        "fetch worker dropped before delivering an outcome",
      )),
    }
  }
}

/// Offload a fetch onto the tokio runtime and return its handle.
///
/// The spawned worker always sends its outcome; if the caller dropped the
/// handle in the meantime the outcome is simply discarded.
pub fn spawn_fetch(
  transformer: Arc<dyn TaskTransformer>,
  identifier: impl Into<String>,
  schema_info: Option<SchemaInfo>,
) -> PendingTask {
  let identifier = identifier.into();
  let (tx, rx) = oneshot::channel();

  let requested = identifier.clone();
  tokio::spawn(async move {
    let outcome = transformer.fetch_task(&requested, schema_info).await;
    let _ = tx.send(outcome);
  });

  PendingTask {
    task_identifier: identifier,
    rx,
  }
}
