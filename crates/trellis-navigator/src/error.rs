use thiserror::Error;

/// Errors raised during step traversal.
///
/// Both variants are fatal to the current run: the host must abandon or
/// restart the task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
  /// A requested step identifier is absent from the step graph.
  #[error("step '{identifier}' not found in the step graph")]
  StepNotFound { identifier: String },

  /// A branch rule targets its own source step and would loop forever.
  #[error("branch rule for step '{identifier}' targets itself")]
  InvalidBranch { identifier: String },
}
