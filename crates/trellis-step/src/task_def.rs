use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use trellis_result::SchemaInfo;

use crate::error::DefinitionError;
use crate::rule::BranchRule;
use crate::step::StepDef;

/// A serializable task definition: the step graph plus task-level metadata.
///
/// Definitions are validated before they are handed to the navigator;
/// a fresh runtime `Task` is built from a definition for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
  pub identifier: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub schema_info: Option<SchemaInfo>,

  pub steps: Vec<StepDef>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub rules: Vec<BranchRule>,

  /// Advisory estimate shown before starting the task.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub estimated_minutes: Option<u32>,
}

impl TaskDef {
  /// Parse a task definition from JSON and validate it.
  pub fn from_json(content: &str) -> Result<Self, DefinitionError> {
    let def: TaskDef = serde_json::from_str(content)?;
    def.validate()?;
    Ok(def)
  }

  /// Look up a step by identifier.
  pub fn step(&self, identifier: &str) -> Option<&StepDef> {
    self.steps.iter().find(|s| s.identifier == identifier)
  }

  /// Validate structural invariants of the definition.
  ///
  /// Rejects duplicate step identifiers (top level and within each form)
  /// and rules referencing unknown steps. A self-referential rule passes
  /// validation with a warning; the navigator refuses it at traversal with
  /// `InvalidBranch`.
  pub fn validate(&self) -> Result<(), DefinitionError> {
    if self.steps.is_empty() {
      return Err(DefinitionError::EmptySteps);
    }

    let mut seen = HashSet::new();
    for step in &self.steps {
      if !seen.insert(step.identifier.as_str()) {
        return Err(DefinitionError::DuplicateStepIdentifier {
          identifier: step.identifier.clone(),
        });
      }

      let mut children_seen = HashSet::new();
      for child in step.children() {
        if !children_seen.insert(child.identifier.as_str()) {
          return Err(DefinitionError::DuplicateFormChild {
            form: step.identifier.clone(),
            identifier: child.identifier.clone(),
          });
        }
      }
    }

    for rule in &self.rules {
      if !seen.contains(rule.after.as_str()) {
        return Err(DefinitionError::UnknownRuleSource {
          identifier: rule.after.clone(),
        });
      }
      if !seen.contains(rule.skip_to.as_str()) {
        return Err(DefinitionError::UnknownRuleTarget {
          identifier: rule.skip_to.clone(),
        });
      }
      if rule.is_self_referential() {
        warn!(
          identifier = %rule.after,
          "branch rule targets its own source step; traversal will refuse it"
        );
      }
    }

    Ok(())
  }
}
