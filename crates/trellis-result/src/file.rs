use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result backed by an on-device byte stream, e.g. a sensor recording.
///
/// The absolute `url` is a process-local detail with participant-identifying
/// potential and is never serialized; only `relative_path` leaves the device,
/// as the filename inside an archive bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
  pub identifier: String,

  pub start_date: DateTime<Utc>,

  pub end_date: DateTime<Utc>,

  /// Monotonic clock value (seconds) when the recorder was started, used to
  /// align sample timestamps. Absent when not applicable.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_uptime: Option<f64>,

  /// Absolute path to the backing file. Never serialized.
  #[serde(skip)]
  pub url: Option<PathBuf>,

  /// Stable path fragment used when the bytes are moved into an archive.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub relative_path: Option<String>,

  /// MIME content type. Absent means "unknown binary".
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,

  /// Number of samples appended while the recorder was open.
  #[serde(default)]
  pub sample_count: u64,
}

impl FileResult {
  /// Create a fresh file result with no backing file yet.
  pub fn new(identifier: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      identifier: identifier.into(),
      start_date: now,
      end_date: now,
      start_uptime: None,
      url: None,
      relative_path: None,
      content_type: None,
      sample_count: 0,
    }
  }

  /// Whether the recorder produced a backing file.
  pub fn has_file(&self) -> bool {
    self.url.is_some() && self.relative_path.is_some()
  }
}
