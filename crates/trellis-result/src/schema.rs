use serde::{Deserialize, Serialize};

/// Versioning tag for the result format of a task.
///
/// Carried on the task definition and copied into the root [`TaskResult`]
/// so that downstream archiving/upload tooling can validate the payload
/// against the matching schema revision.
///
/// [`TaskResult`]: crate::TaskResult
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
  /// Schema identifier, e.g. "tapping-v2". Defaults to the task identifier
  /// when not specified.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub identifier: Option<String>,

  /// Schema revision number.
  pub revision: u32,
}

impl SchemaInfo {
  /// Create a schema info with the given revision and no identifier override.
  pub fn revision(revision: u32) -> Self {
    Self {
      identifier: None,
      revision,
    }
  }
}
