use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_result::FileResult;

use crate::error::ArchiveError;

/// Metadata describing how a file result's bytes are named and typed when
/// relocated into an output bundle.
///
/// Only the `relative_path`-derived filename appears here; the absolute
/// on-device `url` must never leave the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveManifest {
  /// Archive filename; equals the result's `relative_path`.
  pub filename: String,

  /// The result's start timestamp.
  pub timestamp: DateTime<Utc>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,

  pub identifier: String,

  /// Path of step identifiers from the task root to this result.
  pub step_path: String,
}

/// A manifest paired with the bytes it describes.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
  pub manifest: ArchiveManifest,
  pub data: Bytes,
}

/// Read a file result's bytes and pair them with an archive manifest.
///
/// Returns `Ok(None)` when the result has no backing file, a legitimate
/// "recorder produced nothing" case, not an error. A failed read is a
/// [`ArchiveError::ReadFailure`]; the caller must treat that file result as
/// unrecoverable.
pub async fn build_archive_data(
  result: &FileResult,
  step_path: &str,
) -> Result<Option<ArchiveEntry>, ArchiveError> {
  let (Some(url), Some(relative_path)) = (&result.url, &result.relative_path) else {
    return Ok(None);
  };

  let data = tokio::fs::read(url)
    .await
    .map_err(|e| ArchiveError::ReadFailure {
      identifier: result.identifier.clone(),
      source: e,
    })?;

  Ok(Some(ArchiveEntry {
    manifest: ArchiveManifest {
      filename: relative_path.clone(),
      timestamp: result.start_date,
      content_type: result.content_type.clone(),
      identifier: result.identifier.clone(),
      step_path: step_path.to_string(),
    },
    data: Bytes::from(data),
  }))
}
