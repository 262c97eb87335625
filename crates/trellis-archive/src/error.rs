use thiserror::Error;

/// Errors raised while recording or archiving file results.
#[derive(Debug, Error)]
pub enum ArchiveError {
  /// The backing file could not be read (missing, moved, permission).
  /// The caller must treat this file result as unrecoverable rather than
  /// retrying the same path.
  #[error("failed to read file result '{identifier}': {source}")]
  ReadFailure {
    identifier: String,
    #[source]
    source: std::io::Error,
  },

  /// A file result was archived twice; re-archiving is a usage error.
  #[error("file result '{identifier}' at '{step_path}' was already archived")]
  AlreadyArchived {
    step_path: String,
    identifier: String,
  },

  /// An I/O error occurred while writing recording or archive bytes.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
