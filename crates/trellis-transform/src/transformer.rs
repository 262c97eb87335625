use std::time::Duration;

use async_trait::async_trait;
use trellis_navigator::Task;
use trellis_result::SchemaInfo;

use crate::error::FetchError;

/// Asynchronous provider of runtime tasks.
///
/// A fetch resolves to exactly one outcome: a task or a [`FetchError`],
/// never both, never neither. Implementations may do their work on a
/// background execution context but must not retry internally; retry
/// policy belongs to the caller.
#[async_trait]
pub trait TaskTransformer: Send + Sync {
  /// Fetch and build the task for `identifier`.
  ///
  /// A caller-supplied `schema_info` overrides the schema info carried by
  /// the fetched definition.
  async fn fetch_task(
    &self,
    identifier: &str,
    schema_info: Option<SchemaInfo>,
  ) -> Result<Task, FetchError>;

  /// Advisory fetch duration hint, not a timeout.
  ///
  /// Zero means "assume already resident, do not show a loading
  /// affordance".
  fn estimated_fetch_time(&self) -> Duration {
    Duration::ZERO
  }
}
