use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic answer container for a single step.
///
/// A fresh answer result (no `value`) represents "this step was visited but
/// nothing recorded yet". The presentation layer merges an updated copy back
/// into the task result once the participant answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
  pub identifier: String,

  pub start_date: DateTime<Utc>,

  pub end_date: DateTime<Utc>,

  /// The recorded answer, if any.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<Value>,
}

impl AnswerResult {
  /// Create a fresh answer result with no recorded value.
  pub fn new(identifier: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      identifier: identifier.into(),
      start_date: now,
      end_date: now,
      value: None,
    }
  }

  /// Create an answer result carrying a recorded value.
  pub fn with_value(identifier: impl Into<String>, value: Value) -> Self {
    let mut result = Self::new(identifier);
    result.value = Some(value);
    result.end_date = Utc::now();
    result
  }

  /// Whether the participant recorded an answer.
  pub fn is_answered(&self) -> bool {
    self.value.is_some()
  }
}
