use thiserror::Error;

/// Errors raised while fetching a task definition.
#[derive(Debug, Error)]
pub enum FetchError {
  /// A network connection is required and unavailable. Retryable by the
  /// caller once connectivity returns; the transformer itself never
  /// retries.
  #[error("network required but unavailable")]
  Offline,

  /// Deserialization or other unexpected failure. Not retryable without a
  /// new task definition.
  #[error("task fetch failed: {message}")]
  Unknown { message: String },
}

impl FetchError {
  /// Build an `Unknown` error from any displayable cause.
  pub fn unknown(message: impl ToString) -> Self {
    FetchError::Unknown {
      message: message.to_string(),
    }
  }

  /// Whether the caller may retry the same fetch.
  pub fn is_retryable(&self) -> bool {
    matches!(self, FetchError::Offline)
  }
}
