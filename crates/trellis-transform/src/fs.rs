use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use trellis_navigator::Task;
use trellis_result::SchemaInfo;
use trellis_step::TaskDef;

use crate::error::FetchError;
use crate::transformer::TaskTransformer;

/// Filesystem-backed task transformer.
///
/// Task definitions are stored as one JSON document per task:
/// ```text
/// {root}/
/// ├── tremor.json
/// └── walk-and-balance.json
/// ```
///
/// Definitions are already resident, so the estimated fetch time is zero.
/// A missing or malformed document is an `Unknown` fetch error; this
/// transformer never reports `Offline`.
pub struct FsTaskTransformer {
  root: PathBuf,
}

impl FsTaskTransformer {
  /// Create a transformer over the given resource directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// The resource directory this transformer reads from.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn definition_path(&self, identifier: &str) -> PathBuf {
    self.root.join(format!("{identifier}.json"))
  }
}

#[async_trait]
impl TaskTransformer for FsTaskTransformer {
  async fn fetch_task(
    &self,
    identifier: &str,
    schema_info: Option<SchemaInfo>,
  ) -> Result<Task, FetchError> {
    let path = self.definition_path(identifier);
    debug!(identifier, path = %path.display(), "fetching task definition");

    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
      FetchError::unknown(format!(
        "failed to read task definition '{}': {}",
        path.display(),
        e
      ))
    })?;

    let def = TaskDef::from_json(&content).map_err(FetchError::unknown)?;
    if def.identifier != identifier {
      warn!(
        requested = identifier,
        found = %def.identifier,
        "task definition identifier does not match its resource name"
      );
    }

    let mut task = Task::from_def(def).map_err(FetchError::unknown)?;
    if schema_info.is_some() {
      task.schema_info = schema_info;
    }
    Ok(task)
  }

  fn estimated_fetch_time(&self) -> Duration {
    Duration::ZERO
  }
}
