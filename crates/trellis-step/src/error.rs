use thiserror::Error;

/// Errors raised while parsing or validating a task definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
  #[error("failed to parse task definition: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("duplicate step identifier: {identifier}")]
  DuplicateStepIdentifier { identifier: String },

  #[error("form '{form}' has duplicate child identifier: {identifier}")]
  DuplicateFormChild { form: String, identifier: String },

  #[error("branch rule references unknown source step: {identifier}")]
  UnknownRuleSource { identifier: String },

  #[error("branch rule references unknown target step: {identifier}")]
  UnknownRuleTarget { identifier: String },

  #[error("task definition has no steps")]
  EmptySteps,
}
