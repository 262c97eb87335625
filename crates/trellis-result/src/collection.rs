use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::StepResult;

/// Ordered, identifier-keyed set of child results.
///
/// Produced by composite (form) steps. Child identifiers are unique within
/// one collection; insertion order is first-registration order and is never
/// reshuffled by later updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
  pub identifier: String,

  pub start_date: DateTime<Utc>,

  pub end_date: DateTime<Utc>,

  #[serde(default)]
  pub children: Vec<StepResult>,
}

impl CollectionResult {
  /// Create an empty collection result.
  pub fn new(identifier: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      identifier: identifier.into(),
      start_date: now,
      end_date: now,
      children: Vec::new(),
    }
  }

  /// Create a collection result with the given children.
  pub fn with_children(identifier: impl Into<String>, children: Vec<StepResult>) -> Self {
    let mut result = Self::new(identifier);
    result.children = children;
    result
  }

  /// Look up a child result by identifier.
  pub fn find_child(&self, identifier: &str) -> Option<&StepResult> {
    self.children.iter().find(|c| c.identifier() == identifier)
  }

  /// Insert or replace a child result.
  ///
  /// Replaces in place when a child with the same identifier exists so the
  /// first-registration order is preserved; appends otherwise.
  pub fn set_child(&mut self, child: StepResult) {
    match self
      .children
      .iter_mut()
      .find(|c| c.identifier() == child.identifier())
    {
      Some(existing) => *existing = child,
      None => self.children.push(child),
    }
  }
}
