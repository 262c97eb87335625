use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use trellis_result::FileResult;

use crate::error::ArchiveError;

static PROCESS_ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Monotonic seconds since the process anchor, for aligning sample
/// timestamps across recorders.
fn uptime() -> f64 {
  PROCESS_ANCHOR.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Map a MIME content type to an archive-appropriate file extension.
fn extension_for(content_type: Option<&str>) -> &'static str {
  match content_type {
    Some("application/json") => "json",
    Some("text/csv") => "csv",
    Some("video/mp4") => "mp4",
    Some("audio/m4a") => "m4a",
    _ => "dat",
  }
}

/// Single-writer recorder backing one file result.
///
/// Created when a recording step begins, grown with `append` while open,
/// and sealed into a [`FileResult`] when the step ends. The recorder's
/// owner is solely responsible for serializing writes; there is no
/// internal locking.
pub struct FileRecorder {
  identifier: String,
  content_type: Option<String>,
  path: PathBuf,
  relative_path: String,
  writer: BufWriter<File>,
  sample_count: u64,
  start_date: DateTime<Utc>,
  start_uptime: f64,
}

impl FileRecorder {
  /// Open a recorder for `identifier` inside `dir`.
  ///
  /// The backing filename is the identifier plus a content-type-appropriate
  /// extension; that fragment becomes the result's `relative_path`.
  pub async fn create(
    dir: &Path,
    identifier: &str,
    content_type: Option<&str>,
  ) -> Result<Self, ArchiveError> {
    let relative_path = format!("{identifier}.{}", extension_for(content_type));
    let path = dir.join(&relative_path);

    tokio::fs::create_dir_all(dir).await?;
    let file = File::create(&path).await?;
    debug!(identifier, path = %path.display(), "opened file recorder");

    Ok(Self {
      identifier: identifier.to_string(),
      content_type: content_type.map(str::to_string),
      path,
      relative_path,
      writer: BufWriter::new(file),
      sample_count: 0,
      start_date: Utc::now(),
      start_uptime: uptime(),
    })
  }

  /// Number of samples appended so far.
  pub fn sample_count(&self) -> u64 {
    self.sample_count
  }

  /// Append one sample to the open byte stream.
  pub async fn append(&mut self, sample: &[u8]) -> Result<(), ArchiveError> {
    self.writer.write_all(sample).await?;
    self.sample_count += 1;
    Ok(())
  }

  /// Flush, close, and produce the sealed file result.
  pub async fn seal(mut self) -> Result<FileResult, ArchiveError> {
    self.writer.flush().await?;
    self.writer.into_inner().sync_all().await?;
    debug!(
      identifier = %self.identifier,
      samples = self.sample_count,
      "sealed file recorder"
    );

    let mut result = FileResult::new(&self.identifier);
    result.start_date = self.start_date;
    result.end_date = Utc::now();
    result.start_uptime = Some(self.start_uptime);
    result.url = Some(self.path);
    result.relative_path = Some(self.relative_path);
    result.content_type = self.content_type;
    result.sample_count = self.sample_count;
    Ok(result)
  }
}
